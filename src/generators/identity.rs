//! `uint`-backed identity structs from `*IdentityStructs.json` files.
//!
//! Each entry becomes a `readonly partial struct` in
//! `Snap.Hutao.Model.Primitive` with conversions to and from `uint`,
//! equality, comparison, addition, subtraction and increment operators, and
//! an `IdentityConverter<T>` JSON converter attribute.

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::base::names::global;
use crate::diagnostics::{Diagnostic, Location, descriptors};
use crate::error::{Cancelled, Result};
use crate::host::AdditionalText;
use crate::syntax::SyntaxKind;
use crate::syntax::factory::{
    ArgumentSyntax, AttributeListSyntax, AttributeSyntax, Body, CompilationUnitSyntax,
    ConstructorDeclarationSyntax, ConversionOperatorDeclarationSyntax, ExpressionSyntax,
    FieldDeclarationSyntax, MemberSyntax, MethodDeclarationSyntax, Modifier,
    OperatorDeclarationSyntax, ParameterSyntax, PatternSyntax, StatementSyntax, TriviaSyntax,
    TypeDeclarationKind, TypeDeclarationSyntax, TypeSyntax,
};

const FILE_SUFFIX: &str = "IdentityStructs.json";
const NAMESPACE: &str = "Snap.Hutao.Model.Primitive";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdentityContext {
    pub name: String,
    pub documentation: String,
}

#[derive(Debug, Deserialize)]
struct IdentityStructEntry {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Documentation")]
    documentation: Option<String>,
}

pub fn is_identity_structs(text: &AdditionalText) -> bool {
    text.ends_with_ignore_case(FILE_SUFFIX)
}

/// Reads one identity structs file. Entries without a name are dropped.
pub fn read_file(text: &AdditionalText) -> std::result::Result<Vec<IdentityContext>, Diagnostic> {
    let entries: Vec<IdentityStructEntry> = serde_json::from_str(&text.text).map_err(|error| {
        tracing::warn!(path = %text.path, %error, "identity structs not parsed");
        let message = error.to_string();
        descriptors::IDENTITY_STRUCTS.create(
            Some(Location::file(text.path.clone())),
            &[text.path.as_str(), message.as_str()],
        )
    })?;

    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry.name {
            Some(name) if !name.is_empty() => Some(IdentityContext {
                name,
                documentation: entry.documentation.unwrap_or_default(),
            }),
            _ => None,
        })
        .collect())
}

pub fn collect(
    files: &[AdditionalText],
    cancel: &CancellationToken,
) -> std::result::Result<Collected<IdentityContext>, Cancelled> {
    let mut read = Vec::new();
    for text in files.iter().filter(|text| is_identity_structs(text)) {
        Cancelled::check(cancel)?;
        read.push(read_file(text));
    }
    Ok(assemble(read))
}

pub fn assemble(
    read: Vec<std::result::Result<Vec<IdentityContext>, Diagnostic>>,
) -> Collected<IdentityContext> {
    let mut contexts = Vec::new();
    let mut diagnostics = Vec::new();
    for result in read {
        match result {
            Ok(entries) => contexts.extend(entries),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    tracing::debug!(stage = GeneratorKind::Identity.name(), contexts = contexts.len());
    Collected::new(contexts, diagnostics)
}

pub struct IdentityStage;

impl Stage for IdentityStage {
    const KIND: GeneratorKind = GeneratorKind::Identity;
    type Context = IdentityContext;

    fn emit(context: &IdentityContext, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        cx.check()?;
        let name = context.name.as_str();
        let this = || TypeSyntax::parse(name);

        let converter = AttributeSyntax::with_arguments(
            global::JSON_CONVERTER,
            vec![ArgumentSyntax::new(ExpressionSyntax::type_of(TypeSyntax::generic(
                global::IDENTITY_CONVERTER,
                vec![this()],
            )))],
        );

        let declaration = TypeDeclarationSyntax::new(TypeDeclarationKind::Struct, name)
            .leading_trivia(TriviaSyntax::new().doc_summary(&[context.documentation.as_str()]))
            .attribute_list(AttributeListSyntax::single(converter))
            .modifiers(&[Modifier::Internal, Modifier::Readonly, Modifier::Partial])
            .base_list(base_types(name))
            .members(members(name))
            .build();

        let unit = CompilationUnitSyntax::new()
            .leading_trivia(TriviaSyntax::nullable_enable())
            .namespace(NAMESPACE)
            .member(declaration)
            .build();
        Ok(vec![cx.document(format!("{name}.g.cs"), &unit)])
    }
}

fn base_types(name: &str) -> Vec<TypeSyntax> {
    let this = || TypeSyntax::parse(name);
    let numerics = |interface: &str, args: Vec<TypeSyntax>| {
        TypeSyntax::generic(&format!("{}.{interface}", global::NUMERICS), args)
    };
    vec![
        TypeSyntax::parse(global::I_COMPARABLE),
        TypeSyntax::generic(global::I_COMPARABLE, vec![this()]),
        TypeSyntax::generic(global::I_EQUATABLE, vec![this()]),
        numerics("IEqualityOperators", vec![this(), this(), TypeSyntax::bool()]),
        numerics("IEqualityOperators", vec![this(), TypeSyntax::uint(), TypeSyntax::bool()]),
        numerics("IComparisonOperators", vec![this(), this(), TypeSyntax::bool()]),
        numerics("IAdditionOperators", vec![this(), this(), this()]),
        numerics("IAdditionOperators", vec![this(), TypeSyntax::uint(), this()]),
        numerics("ISubtractionOperators", vec![this(), this(), this()]),
        numerics("ISubtractionOperators", vec![this(), TypeSyntax::uint(), this()]),
        numerics("IIncrementOperators", vec![this()]),
        numerics("IDecrementOperators", vec![this()]),
    ]
}

fn ident(name: &str) -> ExpressionSyntax {
    ExpressionSyntax::ident(name)
}

/// `name.Value`
fn value_of(name: &str) -> ExpressionSyntax {
    ident(name).member("Value")
}

fn block(statements: Vec<StatementSyntax>) -> Body {
    Body::Block(statements)
}

/// `public static R operator op(L left, Rt right) { return body; }`
fn binary_operator(
    result: TypeSyntax,
    op: SyntaxKind,
    left: TypeSyntax,
    right: TypeSyntax,
    body: ExpressionSyntax,
) -> MemberSyntax {
    OperatorDeclarationSyntax::new(result, op)
        .modifiers(&[Modifier::Public, Modifier::Static])
        .parameters(vec![ParameterSyntax::new(left, "left"), ParameterSyntax::new(right, "right")])
        .body(block(vec![StatementSyntax::ret(body)]))
        .build()
}

/// `++*(uint*)&value; return value;` and the decrement twin.
fn step_operator(name: &str, op: SyntaxKind) -> MemberSyntax {
    let address = ExpressionSyntax::prefix(SyntaxKind::Amp, ident("value"));
    let target = ExpressionSyntax::prefix(
        SyntaxKind::Star,
        ExpressionSyntax::cast(TypeSyntax::uint().pointer(), address),
    );
    OperatorDeclarationSyntax::new(TypeSyntax::parse(name), op)
        .modifiers(&[Modifier::Public, Modifier::Static, Modifier::Unsafe])
        .parameters(vec![ParameterSyntax::new(TypeSyntax::parse(name), "value")])
        .body(block(vec![
            StatementSyntax::expression(ExpressionSyntax::prefix(op, target)),
            StatementSyntax::ret(ident("value")),
        ]))
        .build()
}

fn members(name: &str) -> Vec<MemberSyntax> {
    let this = || TypeSyntax::parse(name);
    let uint = TypeSyntax::uint;
    let values_compared = |op: SyntaxKind| value_of("left").binary(op, value_of("right"));

    let mut members = vec![
        FieldDeclarationSyntax::new(uint(), "Value")
            .modifiers(&[Modifier::Public, Modifier::Readonly])
            .build(),
        ConstructorDeclarationSyntax::new(name)
            .modifiers(&[Modifier::Public])
            .parameters(vec![ParameterSyntax::new(uint(), "value")])
            .body(block(vec![StatementSyntax::expression(
                ident("Value").assign(ident("value")),
            )]))
            .build(),
        ConversionOperatorDeclarationSyntax::implicit(uint())
            .modifiers(&[Modifier::Public, Modifier::Static])
            .parameters(vec![ParameterSyntax::new(this(), "value")])
            .body(block(vec![StatementSyntax::ret(value_of("value"))]))
            .build(),
        ConversionOperatorDeclarationSyntax::implicit(this())
            .modifiers(&[Modifier::Public, Modifier::Static])
            .parameters(vec![ParameterSyntax::new(uint(), "value")])
            .body(block(vec![StatementSyntax::ret(ExpressionSyntax::new_implicit(vec![
                ident("value").into(),
            ]))]))
            .build(),
        // object overrides
        MethodDeclarationSyntax::new(TypeSyntax::bool(), "Equals")
            .modifiers(&[Modifier::Public, Modifier::Override])
            .parameters(vec![ParameterSyntax::new(TypeSyntax::object().nullable(), "obj")])
            .body(block(vec![StatementSyntax::ret(
                ident("obj")
                    .is_pattern(PatternSyntax::declaration(this(), "other"))
                    .binary(SyntaxKind::AmpAmp, ident("Equals").call(vec![ident("other")])),
            )]))
            .build(),
        MethodDeclarationSyntax::new(TypeSyntax::keyword("int"), "GetHashCode")
            .modifiers(&[Modifier::Public, Modifier::Override])
            .body(block(vec![StatementSyntax::ret(
                ident("Value").member("GetHashCode").call(Vec::new()),
            )]))
            .build(),
        MethodDeclarationSyntax::new(TypeSyntax::string(), "ToString")
            .modifiers(&[Modifier::Public, Modifier::Override])
            .body(block(vec![StatementSyntax::ret(
                ident("Value").member("ToString").call(Vec::new()),
            )]))
            .build(),
        MethodDeclarationSyntax::new(TypeSyntax::keyword("int"), "CompareTo")
            .modifiers(&[Modifier::Public])
            .parameters(vec![ParameterSyntax::new(TypeSyntax::object().nullable(), "obj")])
            .body(block(vec![
                StatementSyntax::if_then(
                    ident("obj").is_pattern(PatternSyntax::constant(ExpressionSyntax::null())),
                    vec![StatementSyntax::ret(ExpressionSyntax::number("1"))],
                ),
                StatementSyntax::if_then(
                    ident("obj").is_pattern(PatternSyntax::not(PatternSyntax::declaration(this(), "other"))),
                    vec![StatementSyntax::throw(ExpressionSyntax::new_object(
                        TypeSyntax::parse(global::ARGUMENT_EXCEPTION),
                        vec![ExpressionSyntax::string(&format!("Object must be of type {name}.")).into()],
                    ))],
                ),
                StatementSyntax::ret(ident("Value").member("CompareTo").call(vec![value_of("other")])),
            ]))
            .build(),
        MethodDeclarationSyntax::new(TypeSyntax::keyword("int"), "CompareTo")
            .modifiers(&[Modifier::Public])
            .parameters(vec![ParameterSyntax::new(this(), "other")])
            .body(block(vec![StatementSyntax::ret(
                ident("Value").member("CompareTo").call(vec![value_of("other")]),
            )]))
            .build(),
        MethodDeclarationSyntax::new(TypeSyntax::bool(), "Equals")
            .modifiers(&[Modifier::Public])
            .parameters(vec![ParameterSyntax::new(this(), "other")])
            .body(block(vec![StatementSyntax::ret(
                ident("Value").binary(SyntaxKind::EqEq, value_of("other")),
            )]))
            .build(),
        // equality
        binary_operator(TypeSyntax::bool(), SyntaxKind::EqEq, this(), this(), values_compared(SyntaxKind::EqEq)),
        binary_operator(
            TypeSyntax::bool(),
            SyntaxKind::NotEq,
            this(),
            this(),
            ExpressionSyntax::prefix(SyntaxKind::Bang, values_compared(SyntaxKind::EqEq).parenthesized()),
        ),
        binary_operator(
            TypeSyntax::bool(),
            SyntaxKind::EqEq,
            this(),
            uint(),
            value_of("left").binary(SyntaxKind::EqEq, ident("right")),
        ),
        binary_operator(
            TypeSyntax::bool(),
            SyntaxKind::NotEq,
            this(),
            uint(),
            ExpressionSyntax::prefix(
                SyntaxKind::Bang,
                ident("left").binary(SyntaxKind::EqEq, ident("right")).parenthesized(),
            ),
        ),
    ];

    // comparison
    for op in [SyntaxKind::Lt, SyntaxKind::Gt, SyntaxKind::LtEq, SyntaxKind::GtEq] {
        members.push(binary_operator(TypeSyntax::bool(), op, this(), this(), values_compared(op)));
    }

    // arithmetic
    for op in [SyntaxKind::Plus, SyntaxKind::Minus] {
        members.push(binary_operator(this(), op, this(), this(), values_compared(op)));
        members.push(binary_operator(
            this(),
            op,
            this(),
            uint(),
            value_of("left").binary(op, ident("right")),
        ));
    }

    members.push(step_operator(name, SyntaxKind::PlusPlus));
    members.push(step_operator(name, SyntaxKind::MinusMinus));
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{body, emit_all};

    fn file(path: &str, text: &str) -> AdditionalText {
        AdditionalText::new(path, text)
    }

    #[test]
    fn test_reads_entries_and_skips_unnamed() {
        let json = r#"[
            {"Name": "AchievementId", "Documentation": "Achievement id"},
            {"Name": "", "Documentation": "ignored"},
            {"Documentation": "ignored too"},
            {"Name": "AvatarId"}
        ]"#;
        let contexts = read_file(&file("Model/IdentityStructs.json", json)).unwrap();
        assert_eq!(
            contexts,
            vec![
                IdentityContext {
                    name: "AchievementId".into(),
                    documentation: "Achievement id".into(),
                },
                IdentityContext {
                    name: "AvatarId".into(),
                    documentation: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_malformed_json_reports_sh502() {
        let files = [
            file("Model/IdentityStructs.json", "{ not an array"),
            file("Model/Other.json", "ignored"),
        ];
        let collected = collect(&files, &CancellationToken::new()).unwrap();
        assert!(collected.contexts.is_empty());
        assert_eq!(collected.diagnostics.len(), 1);
        assert_eq!(collected.diagnostics[0].id, "SH502");
        assert!(collected.diagnostics[0].message.contains("Model/IdentityStructs.json"));
    }

    #[test]
    fn test_emitted_struct() {
        let files = [file(
            "Model/Primitive/IdentityStructs.json",
            r#"[{"Name": "AchievementId", "Documentation": "Achievement id"}]"#,
        )];
        let collected = collect(&files, &CancellationToken::new()).unwrap();
        let emitted = emit_all::<IdentityStage>(&collected);
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].hint, "AchievementId.g.cs");

        let text = body(&emitted[0]);
        assert!(text.starts_with(
            "#nullable enable\nnamespace Snap.Hutao.Model.Primitive;\n\n/// <summary>\n/// Achievement id\n/// </summary>\n\
[global::System.Text.Json.Serialization.JsonConverter(typeof(global::Snap.Hutao.Model.Primitive.Converter.IdentityConverter<AchievementId>))]\n\
internal readonly partial struct AchievementId : global::System.IComparable, global::System.IComparable<AchievementId>,"
        ));
        for line in [
            "    public readonly uint Value;\n",
            "    public AchievementId(uint value)\n",
            "        Value = value;\n",
            "    public static implicit operator uint(AchievementId value)\n",
            "        return new(value);\n",
            "        return obj is AchievementId other && Equals(other);\n",
            "        if (obj is not AchievementId other)\n",
            "            throw new global::System.ArgumentException(\"Object must be of type AchievementId.\");\n",
            "    public static bool operator ==(AchievementId left, AchievementId right)\n",
            "        return !(left.Value == right.Value);\n",
            "    public static bool operator !=(AchievementId left, uint right)\n",
            "        return !(left == right);\n",
            "    public static bool operator <=(AchievementId left, AchievementId right)\n",
            "    public static AchievementId operator +(AchievementId left, uint right)\n",
            "        return left.Value - right;\n",
            "    public static unsafe AchievementId operator ++(AchievementId value)\n",
            "        ++*(uint*)&value;\n",
            "        --*(uint*)&value;\n",
        ] {
            assert!(text.contains(line), "missing {line:?} in\n{text}");
        }
    }
}
