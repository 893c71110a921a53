//! XAML dependency properties.
//!
//! Each `[DependencyProperty<T>("Name")]` on a type emits the registered
//! `NameProperty` field and either a CLR wrapper property or, for attached
//! properties, the `GetName`/`SetName` accessor pair.

use tokio_util::sync::CancellationToken;

use super::well_known::throw_if_null;
use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::base::StructuralArray;
use crate::base::names::{self, global};
use crate::error::{Cancelled, Result};
use crate::host::{AttributeCandidate, Compilation};
use crate::model::{AttributeDescriptor, HierarchyDescriptor, TypedConstant};
use crate::syntax::factory::{
    AccessorSyntax, Body, ExpressionSyntax, FieldDeclarationSyntax, MemberSyntax,
    MethodDeclarationSyntax, Modifier, ParameterSyntax, PropertyDeclarationSyntax,
    StatementSyntax, TypeSyntax,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DependencyPropertyContext {
    pub hierarchy: HierarchyDescriptor,
    /// Every `DependencyProperty<T>` application, in declaration order.
    pub attributes: StructuralArray<AttributeDescriptor>,
}

pub fn collect(
    compilation: &Compilation,
    cancel: &CancellationToken,
) -> std::result::Result<Collected<DependencyPropertyContext>, Cancelled> {
    let candidates = compilation.candidates_with_attribute(
        names::DEPENDENCY_PROPERTY_ATTRIBUTE,
        |node| node.kind().is_type_declaration(),
        cancel,
    )?;

    let mut contexts = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        Cancelled::check(cancel)?;
        match snapshot(candidate) {
            Ok(Some(context)) => contexts.push(context),
            Ok(None) => tracing::trace!(tree = candidate.tree, "dependency property candidate rejected"),
            Err(error) => tracing::trace!(%error, "dependency property candidate not snapshotted"),
        }
    }

    tracing::debug!(stage = GeneratorKind::DependencyProperty.name(), contexts = contexts.len());
    Ok(Collected::contexts(contexts))
}

fn snapshot(candidate: &AttributeCandidate) -> Result<Option<DependencyPropertyContext>> {
    let Some(ty) = candidate.symbol.as_type() else {
        return Ok(None);
    };
    Ok(Some(DependencyPropertyContext {
        hierarchy: HierarchyDescriptor::from_symbol(ty),
        attributes: AttributeDescriptor::all_from(&candidate.attributes)?,
    }))
}

pub struct DependencyPropertyStage;

impl Stage for DependencyPropertyStage {
    const KIND: GeneratorKind = GeneratorKind::DependencyProperty;
    type Context = DependencyPropertyContext;

    fn emit(context: &DependencyPropertyContext, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        let mut members = Vec::new();
        for attribute in context.attributes.iter() {
            cx.check()?;
            members.extend(property_members(context.hierarchy.name(), attribute));
        }
        let unit = context.hierarchy.compilation_unit(members, Vec::new());
        Ok(vec![cx.document(context.hierarchy.hint(".DependencyProperty.g.cs"), &unit)])
    }
}

/// Members for one attribute; nothing when the name or type is missing.
fn property_members(owner: &str, attribute: &AttributeDescriptor) -> Vec<MemberSyntax> {
    let (Some(name), Some(property_type)) = (attribute.constructor_string(0), attribute.type_argument(0))
    else {
        return Vec::new();
    };
    let bare_type = || TypeSyntax::parse(&property_type.fully_qualified_name);
    let annotated_type = || {
        if attribute.has_named_argument("NotNull", true) {
            bare_type()
        } else {
            bare_type().nullable()
        }
    };

    // CreateDefaultValueCallback wins over DefaultValue so the value is
    // created per instance.
    let mut create_arguments = vec![match (
        attribute.named_string("CreateDefaultValueCallbackName"),
        attribute.named_argument("DefaultValue"),
    ) {
        (Some(callback), _) => ExpressionSyntax::ident(callback).call(Vec::new()),
        (None, Some(value)) => value.to_expression(),
        (None, None) => ExpressionSyntax::default_of(TypeSyntax::object()),
    }];
    if let Some(callback) = attribute.named_string("PropertyChangedCallbackName") {
        create_arguments.push(ExpressionSyntax::ident(callback));
    }

    let is_attached = attribute.has_named_argument("IsAttached", true);
    let register = ExpressionSyntax::qualified(global::DEPENDENCY_PROPERTY)
        .member(if is_attached { "RegisterAttached" } else { "Register" })
        .call(vec![
            ExpressionSyntax::string(name),
            ExpressionSyntax::type_of(bare_type()),
            ExpressionSyntax::type_of(TypeSyntax::parse(owner)),
            ExpressionSyntax::qualified(global::PROPERTY_METADATA)
                .member("Create")
                .call(create_arguments),
        ]);

    let field_name = format!("{name}Property");
    let field = || ExpressionSyntax::ident(&field_name);
    let mut members = vec![
        FieldDeclarationSyntax::new(TypeSyntax::parse(global::DEPENDENCY_PROPERTY), &field_name)
            .modifiers(&[Modifier::Private, Modifier::Static, Modifier::Readonly])
            .initializer(register)
            .build(),
    ];

    if !is_attached {
        members.push(
            PropertyDeclarationSyntax::new(annotated_type(), name)
                .modifiers(&[Modifier::Public])
                .accessors(vec![
                    AccessorSyntax::get(Body::Expression(ExpressionSyntax::cast(
                        bare_type(),
                        ExpressionSyntax::ident("GetValue").call(vec![field()]),
                    ))),
                    AccessorSyntax::set(Body::Expression(
                        ExpressionSyntax::ident("SetValue")
                            .call(vec![field(), ExpressionSyntax::ident("value")]),
                    )),
                ])
                .build(),
        );
        return members;
    }

    let target = || match attribute.named_argument("TargetType") {
        Some(TypedConstant::Type {
            fully_qualified_name,
            ..
        }) => TypeSyntax::parse(fully_qualified_name),
        _ => TypeSyntax::parse(global::DEPENDENCY_OBJECT),
    };
    let obj = || ExpressionSyntax::ident("obj");
    let guard = || StatementSyntax::expression(throw_if_null(obj()));

    members.push(
        MethodDeclarationSyntax::new(annotated_type(), &format!("Get{name}"))
            .modifiers(&[Modifier::Public, Modifier::Static])
            .parameters(vec![ParameterSyntax::new(target(), "obj")])
            .body(Body::Block(vec![
                guard(),
                StatementSyntax::ret(ExpressionSyntax::cast(
                    annotated_type(),
                    obj().member("GetValue").call(vec![field()]),
                )),
            ]))
            .build(),
    );
    members.push(
        MethodDeclarationSyntax::new(TypeSyntax::void(), &format!("Set{name}"))
            .modifiers(&[Modifier::Public, Modifier::Static])
            .parameters(vec![
                ParameterSyntax::new(target(), "obj"),
                ParameterSyntax::new(annotated_type(), "value"),
            ])
            .body(Body::Block(vec![
                guard(),
                StatementSyntax::expression(
                    obj()
                        .member("SetValue")
                        .call(vec![field(), ExpressionSyntax::ident("value")]),
                ),
            ]))
            .build(),
    );
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{body, compilation, emit_all, special, type_from_metadata_name};
    use crate::host::{AttributeData, ConstantValue, SpecialType, TypeSymbol};

    fn dependency_property(ty: &TypeSymbol, name: &str) -> AttributeData {
        let class = type_from_metadata_name(names::DEPENDENCY_PROPERTY_ATTRIBUTE).construct(vec![ty.clone()]);
        AttributeData::new(&class).arg(ConstantValue::string(name))
    }

    fn emitted(attributes: Vec<AttributeData>) -> String {
        let control = attributes
            .into_iter()
            .fold(TypeSymbol::class("App.Controls", "Card"), |builder, attribute| {
                builder.attribute(attribute)
            })
            .build();
        let collected = collect(&compilation(vec![control]), &CancellationToken::new()).unwrap();
        let files = emit_all::<DependencyPropertyStage>(&collected);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].hint, "App.Controls.Card.DependencyProperty.g.cs");
        body(&files[0]).to_string()
    }

    #[test]
    fn test_instance_property() {
        let text = emitted(vec![
            dependency_property(&special(SpecialType::String), "Title")
                .named("PropertyChangedCallbackName", ConstantValue::string("OnTitleChanged")),
        ]);
        let expected = "\
namespace App.Controls;

#nullable enable
partial class Card
{
    private static readonly global::Microsoft.UI.Xaml.DependencyProperty TitleProperty = global::Microsoft.UI.Xaml.DependencyProperty.Register(\"Title\", typeof(string), typeof(Card), global::Microsoft.UI.Xaml.PropertyMetadata.Create(default(object), OnTitleChanged));

    public string? Title
    {
        get => (string)GetValue(TitleProperty);
        set => SetValue(TitleProperty, value);
    }
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_default_value_priority() {
        let text = emitted(vec![
            dependency_property(&special(SpecialType::Boolean), "IsOpen")
                .named("NotNull", ConstantValue::bool(true))
                .named("DefaultValue", ConstantValue::bool(true))
                .named("CreateDefaultValueCallbackName", ConstantValue::string("CreateIsOpen")),
            dependency_property(&special(SpecialType::Int32), "Count")
                .named("NotNull", ConstantValue::bool(true))
                .named("DefaultValue", ConstantValue::int(3)),
        ]);
        assert!(text.contains("PropertyMetadata.Create(CreateIsOpen()));"));
        assert!(text.contains("PropertyMetadata.Create(3));"));
        assert!(text.contains("    public bool IsOpen\n"));
        assert!(text.contains("    public int Count\n"));
    }

    #[test]
    fn test_attached_property_accessors() {
        let panel = TypeSymbol::class("Microsoft.UI.Xaml.Controls", "Panel").build();
        let text = emitted(vec![
            dependency_property(&special(SpecialType::Double), "Spacing")
                .named("IsAttached", ConstantValue::bool(true))
                .named("TargetType", ConstantValue::type_of(&panel)),
        ]);
        assert!(text.contains("DependencyProperty.RegisterAttached(\"Spacing\", typeof(double), typeof(Card),"));
        assert!(text.contains("    public static double? GetSpacing(global::Microsoft.UI.Xaml.Controls.Panel obj)\n"));
        assert!(text.contains("        global::System.ArgumentNullException.ThrowIfNull(obj);\n"));
        assert!(text.contains("        return (double?)obj.GetValue(SpacingProperty);\n"));
        assert!(text.contains(
            "    public static void SetSpacing(global::Microsoft.UI.Xaml.Controls.Panel obj, double? value)\n"
        ));
        assert!(text.contains("        obj.SetValue(SpacingProperty, value);\n"));
        assert!(!text.contains("public double? Spacing"));
    }

    #[test]
    fn test_attached_defaults_to_dependency_object() {
        let text = emitted(vec![
            dependency_property(&special(SpecialType::Object), "Tag").named("IsAttached", ConstantValue::bool(true)),
        ]);
        assert!(text.contains("GetTag(global::Microsoft.UI.Xaml.DependencyObject obj)"));
    }
}
