//! `UnsafeAccessor` shims for property backing fields.
//!
//! `[FieldAccessor]` on an auto property emits
//! `private static extern ref T FieldRefOfName(Owner self);` bound to the
//! compiler-synthesized backing field. Properties without a setter (or with
//! an `init` setter) get a `ref readonly` return.

use indexmap::IndexMap;
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::base::StructuralArray;
use crate::base::names::{self, global};
use crate::error::{Cancelled, Result};
use crate::host::{AttributeCandidate, Compilation, MemberSymbol};
use crate::model::{FieldDescriptor, HierarchyDescriptor, PropertyDescriptor};
use crate::syntax::SyntaxKind;
use crate::syntax::factory::{
    ArgumentSyntax, AttributeListSyntax, AttributeSyntax, Body, ExpressionSyntax, MemberSyntax,
    MethodDeclarationSyntax, Modifier, ParameterSyntax, TypeSyntax,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldAccessorEntry {
    pub property: PropertyDescriptor,
    pub field: FieldDescriptor,
    pub readonly: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldAccessorContext {
    pub hierarchy: HierarchyDescriptor,
    pub owner: SmolStr,
    pub properties: StructuralArray<FieldAccessorEntry>,
}

/// The partial type and its fully qualified name.
type GroupKey = (HierarchyDescriptor, SmolStr);

pub fn collect(
    compilation: &Compilation,
    cancel: &CancellationToken,
) -> std::result::Result<Collected<FieldAccessorContext>, Cancelled> {
    let candidates = compilation.candidates_with_attribute(
        names::FIELD_ACCESSOR_ATTRIBUTE,
        |node| node.kind() == SyntaxKind::PropertyDecl,
        cancel,
    )?;

    let mut groups: IndexMap<GroupKey, Vec<FieldAccessorEntry>> = IndexMap::new();
    for candidate in &candidates {
        Cancelled::check(cancel)?;
        match snapshot(candidate) {
            Ok(Some((key, entry))) => groups.entry(key).or_default().push(entry),
            Ok(None) => tracing::trace!(tree = candidate.tree, "field accessor candidate rejected"),
            Err(error) => tracing::trace!(%error, "field accessor candidate not snapshotted"),
        }
    }

    let mut contexts: Vec<FieldAccessorContext> = groups
        .into_iter()
        .map(|((hierarchy, owner), mut properties)| {
            properties.sort_by(|left, right| left.property.name.cmp(&right.property.name));
            FieldAccessorContext {
                hierarchy,
                owner,
                properties: properties.into(),
            }
        })
        .collect();
    contexts.sort_by(|left, right| left.hierarchy.file_name_hint.cmp(&right.hierarchy.file_name_hint));

    tracing::debug!(stage = GeneratorKind::FieldAccessor.name(), contexts = contexts.len());
    Ok(Collected::contexts(contexts))
}

fn snapshot(candidate: &AttributeCandidate) -> Result<Option<(GroupKey, FieldAccessorEntry)>> {
    let (Some(property), Some(owner)) = (candidate.symbol.as_property(), &candidate.containing_type) else {
        return Ok(None);
    };
    if property.returns_by_ref || (property.getter.is_none() && property.setter.is_none()) {
        return Ok(None);
    }

    // { get; } { get; init; } { init; } => ref readonly
    let readonly = property.setter.is_none_or(|setter| setter.is_init_only);

    let backing = owner.members.iter().find_map(|member| match member {
        MemberSymbol::Field(field) if field.associated_property.as_ref() == Some(&property.name) => Some(field),
        _ => None,
    });
    let Some(field) = backing else {
        return Ok(None);
    };

    Ok(Some((
        (HierarchyDescriptor::from_symbol(owner), owner.fully_qualified().into()),
        FieldAccessorEntry {
            property: PropertyDescriptor::from_symbol(property)?,
            field: FieldDescriptor::from_symbol(field)?,
            readonly,
        },
    )))
}

pub struct FieldAccessorStage;

impl Stage for FieldAccessorStage {
    const KIND: GeneratorKind = GeneratorKind::FieldAccessor;
    type Context = FieldAccessorContext;

    fn emit(context: &FieldAccessorContext, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        let mut members = Vec::with_capacity(context.properties.len());
        for entry in context.properties.iter() {
            cx.check()?;
            members.push(accessor_method(&context.owner, entry));
        }
        let unit = context.hierarchy.compilation_unit(members, Vec::new());
        Ok(vec![cx.document(context.hierarchy.hint(".FieldAccessor.g.cs"), &unit)])
    }
}

fn accessor_method(owner: &str, entry: &FieldAccessorEntry) -> MemberSyntax {
    let ref_kind = if entry.readonly { "ref readonly" } else { "ref" };
    let return_type = TypeSyntax::parse(&format!(
        "{ref_kind} {}",
        entry.property.fully_qualified_type_name_with_nullability
    ));

    let attribute = AttributeSyntax::with_arguments(
        global::UNSAFE_ACCESSOR,
        vec![
            ArgumentSyntax::new(ExpressionSyntax::qualified(global::UNSAFE_ACCESSOR_KIND).member("Field")),
            ArgumentSyntax::name_equals("Name", ExpressionSyntax::string(&entry.field.name)),
        ],
    );

    MethodDeclarationSyntax::new(return_type, &format!("FieldRefOf{}", entry.property.name))
        .attribute_list(AttributeListSyntax::single(attribute))
        .modifiers(&[Modifier::Private, Modifier::Static, Modifier::Extern])
        .parameters(vec![ParameterSyntax::new(TypeSyntax::parse(owner), "self")])
        .body(Body::None)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{body, compilation, emit_all, marker, special};
    use crate::host::{FieldSymbol, PropertySymbol, SpecialType, TypeSymbol};

    fn settings() -> TypeSymbol {
        let string = special(SpecialType::String);
        TypeSymbol::class("App.Model", "Settings")
            .property(
                PropertySymbol::new("Name", &string)
                    .attribute(marker(names::FIELD_ACCESSOR_ATTRIBUTE))
                    .build(),
            )
            .field(FieldSymbol::new("<Name>k__BackingField", &string).backing("Name").build())
            .property(
                PropertySymbol::new("Id", &special(SpecialType::Int32))
                    .init_only()
                    .attribute(marker(names::FIELD_ACCESSOR_ATTRIBUTE))
                    .build(),
            )
            .field(
                FieldSymbol::new("<Id>k__BackingField", &special(SpecialType::Int32))
                    .readonly()
                    .backing("Id")
                    .build(),
            )
            .property(
                PropertySymbol::new("Computed", &string)
                    .get_only()
                    .attribute(marker(names::FIELD_ACCESSOR_ATTRIBUTE))
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_accessor_shims() {
        let collected = collect(&compilation(vec![settings()]), &CancellationToken::new()).unwrap();
        let files = emit_all::<FieldAccessorStage>(&collected);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].hint, "App.Model.Settings.FieldAccessor.g.cs");
        let expected = "\
namespace App.Model;

#nullable enable
partial class Settings
{
    [global::System.Runtime.CompilerServices.UnsafeAccessor(global::System.Runtime.CompilerServices.UnsafeAccessorKind.Field, Name = \"<Id>k__BackingField\")]
    private static extern ref readonly int FieldRefOfId(global::App.Model.Settings self);

    [global::System.Runtime.CompilerServices.UnsafeAccessor(global::System.Runtime.CompilerServices.UnsafeAccessorKind.Field, Name = \"<Name>k__BackingField\")]
    private static extern ref string FieldRefOfName(global::App.Model.Settings self);
}
";
        assert_eq!(body(&files[0]), expected);
    }

    #[test]
    fn test_property_without_backing_field_is_skipped() {
        let collected = collect(&compilation(vec![settings()]), &CancellationToken::new()).unwrap();
        let names: Vec<&str> = collected.contexts[0]
            .properties
            .iter()
            .map(|entry| entry.property.name.as_str())
            .collect();
        assert_eq!(names, ["Id", "Name"]);
    }
}
