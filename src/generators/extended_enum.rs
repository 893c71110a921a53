//! Localization helpers for `[ExtendedEnum]` enums.
//!
//! Each enum gets a `{Enum}Extension` class in
//! `Snap.Hutao.Resource.Localization` with a switch-based `GetName` and
//! `GetLocalizedDescription*` lookups keyed by `[LocalizationKey]`.

use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::base::StructuralArray;
use crate::base::names::{self, global};
use crate::error::{Cancelled, Result};
use crate::host::{AttributeCandidate, Compilation};
use crate::model::{AttributeDescriptor, TypeDescriptor, find_attribute};
use crate::syntax::SyntaxKind;
use crate::syntax::factory::{
    Body, CompilationUnitSyntax, ExpressionSyntax, MemberSyntax, MethodDeclarationSyntax, Modifier,
    ParameterSyntax, PatternSyntax, StatementSyntax, SwitchArmSyntax, TriviaSyntax,
    TypeDeclarationKind, TypeDeclarationSyntax, TypeSyntax,
};

const LOCALIZATION_NAMESPACE: &str = "Snap.Hutao.Resource.Localization";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedEnumMember {
    pub name: SmolStr,
    /// First constructor argument of `[LocalizationKey]`.
    pub localization_key: Option<SmolStr>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedEnumContext {
    pub file_name_hint: SmolStr,
    pub ty: TypeDescriptor,
    pub members: StructuralArray<ExtendedEnumMember>,
}

pub fn collect(
    compilation: &Compilation,
    cancel: &CancellationToken,
) -> std::result::Result<Collected<ExtendedEnumContext>, Cancelled> {
    let candidates = compilation.candidates_with_attribute(
        names::EXTENDED_ENUM_ATTRIBUTE,
        |node| node.kind() == SyntaxKind::EnumDecl,
        cancel,
    )?;

    let mut contexts = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        Cancelled::check(cancel)?;
        match snapshot(candidate) {
            Ok(Some(context)) => contexts.push(context),
            Ok(None) => tracing::trace!(tree = candidate.tree, "extended enum candidate rejected"),
            Err(error) => tracing::trace!(%error, "extended enum candidate not snapshotted"),
        }
    }

    tracing::debug!(stage = GeneratorKind::ExtendedEnum.name(), contexts = contexts.len());
    Ok(Collected::contexts(contexts))
}

fn snapshot(candidate: &AttributeCandidate) -> Result<Option<ExtendedEnumContext>> {
    let Some(ty) = candidate.symbol.as_type() else {
        return Ok(None);
    };

    let mut members = Vec::new();
    for field in ty.fields().filter(|field| field.is_const) {
        let attributes = AttributeDescriptor::all_from(&field.attributes)?;
        members.push(ExtendedEnumMember {
            name: field.name.clone(),
            localization_key: find_attribute(&attributes, names::LOCALIZATION_KEY_ATTRIBUTE)
                .and_then(|attribute| attribute.constructor_string(0))
                .map(SmolStr::from),
        });
    }

    Ok(Some(ExtendedEnumContext {
        file_name_hint: ty.fully_qualified_metadata_name().into(),
        ty: TypeDescriptor::from_symbol(ty),
        members: members.into(),
    }))
}

pub struct ExtendedEnumStage;

impl Stage for ExtendedEnumStage {
    const KIND: GeneratorKind = GeneratorKind::ExtendedEnum;
    type Context = ExtendedEnumContext;

    fn emit(context: &ExtendedEnumContext, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        cx.check()?;
        let enum_type = || context.ty.type_syntax(true);
        let value = || ExpressionSyntax::ident("value");
        let this_value = || ParameterSyntax::new(enum_type(), "value").modifiers(&[Modifier::This]);
        let resource_manager = || ParameterSyntax::new(TypeSyntax::parse(global::RESOURCE_MANAGER), "resourceManager");
        let culture_info = || ParameterSyntax::new(TypeSyntax::parse(global::CULTURE_INFO), "cultureInfo");
        let current_culture = || ExpressionSyntax::qualified(global::CULTURE_INFO).member("CurrentCulture");
        let string_empty = || ExpressionSyntax::from_type(TypeSyntax::string()).member("Empty");
        let member_pattern = |name: &str| {
            PatternSyntax::constant(ExpressionSyntax::from_type(enum_type()).member(name))
        };
        let method = |name: &str, parameters: Vec<ParameterSyntax>, statements: Vec<StatementSyntax>| {
            MethodDeclarationSyntax::new(TypeSyntax::string().nullable(), name)
                .modifiers(&[Modifier::Public, Modifier::Static])
                .parameters(parameters)
                .body(Body::Block(statements))
                .build()
        };

        let mut name_arms: Vec<SwitchArmSyntax> = context
            .members
            .iter()
            .map(|member| SwitchArmSyntax::new(member_pattern(&member.name), ExpressionSyntax::string(&member.name)))
            .collect();
        name_arms.push(SwitchArmSyntax::discard(
            ExpressionSyntax::qualified(global::ENUM).member("GetName").call(vec![value()]),
        ));

        let mut key_arms: Vec<SwitchArmSyntax> = context
            .members
            .iter()
            .filter_map(|member| {
                let key = member.localization_key.as_ref()?;
                Some(SwitchArmSyntax::new(member_pattern(&member.name), ExpressionSyntax::string(key)))
            })
            .collect();
        key_arms.push(SwitchArmSyntax::discard(string_empty()));

        let members: Vec<MemberSyntax> = vec![
            method(
                "GetName",
                vec![this_value()],
                vec![StatementSyntax::ret(value().switch(name_arms))],
            ),
            method(
                "GetLocalizedDescriptionOrDefault",
                vec![this_value(), resource_manager(), culture_info()],
                vec![
                    StatementSyntax::local(TypeSyntax::string(), "key", value().switch(key_arms)),
                    StatementSyntax::ret(
                        ExpressionSyntax::ident("resourceManager")
                            .member("GetString")
                            .call(vec![ExpressionSyntax::ident("key"), ExpressionSyntax::ident("cultureInfo")]),
                    ),
                ],
            ),
            method(
                "GetLocalizedDescriptionOrDefault",
                vec![this_value(), resource_manager()],
                vec![StatementSyntax::ret(ExpressionSyntax::ident("GetLocalizedDescriptionOrDefault").call(
                    vec![value(), ExpressionSyntax::ident("resourceManager"), current_culture()],
                ))],
            ),
            method(
                "GetLocalizedDescription",
                vec![this_value(), resource_manager(), culture_info()],
                vec![StatementSyntax::ret(
                    ExpressionSyntax::ident("GetLocalizedDescriptionOrDefault")
                        .call(vec![
                            value(),
                            ExpressionSyntax::ident("resourceManager"),
                            ExpressionSyntax::ident("cultureInfo"),
                        ])
                        .coalesce(
                            ExpressionSyntax::ident("GetName")
                                .call(vec![value()])
                                .coalesce(string_empty()),
                        ),
                )],
            ),
            method(
                "GetLocalizedDescription",
                vec![this_value(), resource_manager()],
                vec![StatementSyntax::ret(ExpressionSyntax::ident("GetLocalizedDescription").call(vec![
                    value(),
                    ExpressionSyntax::ident("resourceManager"),
                    current_culture(),
                ]))],
            ),
        ];

        let class = TypeDeclarationSyntax::new(TypeDeclarationKind::Class, &format!("{}Extension", context.ty.name))
            .modifiers(&[Modifier::Internal, Modifier::Static, Modifier::Partial])
            .members(members)
            .build();
        let unit = CompilationUnitSyntax::new()
            .using("System.Globalization")
            .leading_trivia(TriviaSyntax::nullable_enable())
            .namespace(LOCALIZATION_NAMESPACE)
            .member(class)
            .build();
        Ok(vec![cx.document(format!("{}.g.cs", context.file_name_hint), &unit)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{body, compilation, emit_all, marker};
    use crate::host::{ConstantValue, TypeSymbol};

    fn quality() -> TypeSymbol {
        TypeSymbol::enumeration("App.Model.Intrinsic", "QualityType")
            .attribute(marker(names::EXTENDED_ENUM_ATTRIBUTE))
            .enum_member("QUALITY_NONE", 0)
            .enum_member_with(
                "QUALITY_WHITE",
                1,
                vec![marker(names::LOCALIZATION_KEY_ATTRIBUTE).arg(ConstantValue::string("QualityWhite"))],
            )
            .build()
    }

    fn emitted() -> GeneratedFile {
        let collected = collect(&compilation(vec![quality()]), &CancellationToken::new()).unwrap();
        let mut files = emit_all::<ExtendedEnumStage>(&collected);
        assert_eq!(files.len(), 1);
        files.remove(0)
    }

    #[test]
    fn test_extension_class_shape() {
        let file = emitted();
        assert_eq!(file.hint, "App.Model.Intrinsic.QualityType.g.cs");
        let text = body(&file);
        assert!(text.starts_with(
            "using System.Globalization;\n\n#nullable enable\nnamespace Snap.Hutao.Resource.Localization;\n\ninternal static partial class QualityTypeExtension\n{\n"
        ));
        assert_eq!(text.matches("public static string? GetLocalizedDescriptionOrDefault(").count(), 2);
        assert_eq!(text.matches("public static string? GetLocalizedDescription(").count(), 2);
    }

    #[test]
    fn test_get_name_switch() {
        let file = emitted();
        let expected = "\
    public static string? GetName(this global::App.Model.Intrinsic.QualityType value)
    {
        return value switch
        {
            global::App.Model.Intrinsic.QualityType.QUALITY_NONE => \"QUALITY_NONE\",
            global::App.Model.Intrinsic.QualityType.QUALITY_WHITE => \"QUALITY_WHITE\",
            _ => global::System.Enum.GetName(value)
        };
    }
";
        assert!(body(&file).contains(expected));
    }

    #[test]
    fn test_localization_keys_only_for_annotated_members() {
        let file = emitted();
        let lines: Vec<&str> = body(&file).lines().map(str::trim).collect();
        assert!(lines.contains(&"global::App.Model.Intrinsic.QualityType.QUALITY_WHITE => \"QualityWhite\","));
        assert!(!lines.iter().any(|line| line.contains("QUALITY_NONE => \"Quality")));
        assert!(lines.contains(&"_ => string.Empty"));
        assert!(lines.contains(&"return resourceManager.GetString(key, cultureInfo);"));
        assert!(lines.contains(
            &"return GetLocalizedDescriptionOrDefault(value, resourceManager, cultureInfo) ?? GetName(value) ?? string.Empty;"
        ));
        assert!(lines.contains(
            &"return GetLocalizedDescription(value, resourceManager, global::System.Globalization.CultureInfo.CurrentCulture);"
        ));
    }
}
