//! `IPropertyValuesProvider.GetPropertyValue` by property name.
//!
//! Only types listing the interface directly are picked up; the switch
//! covers the type's own public properties.

use indexmap::IndexSet;
use tokio_util::sync::CancellationToken;

use super::well_known::type_has_base_list;
use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::base::StructuralArray;
use crate::base::names;
use crate::error::{Cancelled, Result};
use crate::host::{Accessibility, Compilation, TypeSymbol};
use crate::model::{HierarchyDescriptor, PropertyDescriptor};
use crate::syntax::factory::{
    Body, ExpressionSyntax, MethodDeclarationSyntax, Modifier, ParameterSyntax, PatternSyntax,
    StatementSyntax, SwitchArmSyntax, TypeSyntax,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyValuesContext {
    pub hierarchy: HierarchyDescriptor,
    pub properties: StructuralArray<PropertyDescriptor>,
}

pub fn collect(
    compilation: &Compilation,
    cancel: &CancellationToken,
) -> std::result::Result<Collected<PropertyValuesContext>, Cancelled> {
    let candidates = compilation.syntax_candidates(type_has_base_list, cancel)?;

    let mut contexts = IndexSet::new();
    for candidate in &candidates {
        Cancelled::check(cancel)?;
        let Some(ty) = candidate.symbol.as_ref().and_then(|symbol| symbol.as_type()) else {
            continue;
        };
        if !ty
            .interfaces
            .iter()
            .any(|interface| interface.fully_qualified_metadata_name() == names::PROPERTY_VALUES_PROVIDER)
        {
            continue;
        }
        match snapshot(ty) {
            Ok(context) => {
                contexts.insert(context);
            }
            Err(error) => tracing::trace!(%error, "property values candidate not snapshotted"),
        }
    }

    tracing::debug!(stage = GeneratorKind::PropertyValues.name(), contexts = contexts.len());
    Ok(Collected::contexts(contexts.into_iter().collect()))
}

fn snapshot(ty: &TypeSymbol) -> Result<PropertyValuesContext> {
    let properties = ty
        .properties()
        .filter(|property| property.accessibility == Accessibility::Public)
        .map(PropertyDescriptor::from_symbol)
        .collect::<Result<Vec<_>>>()?;
    Ok(PropertyValuesContext {
        hierarchy: HierarchyDescriptor::from_symbol(ty),
        properties: properties.into(),
    })
}

pub struct PropertyValuesStage;

impl Stage for PropertyValuesStage {
    const KIND: GeneratorKind = GeneratorKind::PropertyValues;
    type Context = PropertyValuesContext;

    fn emit(context: &PropertyValuesContext, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        let mut arms = Vec::with_capacity(context.properties.len() + 1);
        for property in context.properties.iter() {
            cx.check()?;
            // nameof(Name) => Name
            arms.push(SwitchArmSyntax::new(
                PatternSyntax::constant(ExpressionSyntax::name_of(&property.name)),
                ExpressionSyntax::ident(&property.name),
            ));
        }
        arms.push(SwitchArmSyntax::discard(ExpressionSyntax::default_literal()));

        let method = MethodDeclarationSyntax::new(TypeSyntax::object().nullable(), "GetPropertyValue")
            .modifiers(&[Modifier::Public])
            .parameters(vec![ParameterSyntax::new(TypeSyntax::string(), "propertyName")])
            .body(Body::Block(vec![StatementSyntax::ret(
                ExpressionSyntax::ident("propertyName").switch(arms),
            )]))
            .build();
        let unit = context.hierarchy.compilation_unit(vec![method], Vec::new());
        Ok(vec![cx.document(context.hierarchy.hint(".PropertyValues.g.cs"), &unit)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{body, compilation, emit_all, special, type_from_metadata_name};
    use crate::host::{PropertySymbol, SpecialType};

    #[test]
    fn test_switch_over_public_properties() {
        let provider = TypeSymbol::interface("Snap.Hutao.UI.Xaml.Data", "IPropertyValuesProvider")
            .not_partial()
            .build();
        let item = TypeSymbol::class("App.ViewModel", "AvatarView")
            .interface(&provider)
            .property(PropertySymbol::new("Name", &special(SpecialType::String)).build())
            .property(PropertySymbol::new("Level", &special(SpecialType::Int32)).build())
            .property(
                PropertySymbol::new("Secret", &special(SpecialType::String))
                    .accessibility(Accessibility::Private)
                    .build(),
            )
            .build();

        let collected = collect(&compilation(vec![item]), &CancellationToken::new()).unwrap();
        let files = emit_all::<PropertyValuesStage>(&collected);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].hint, "App.ViewModel.AvatarView.PropertyValues.g.cs");
        let expected = "\
namespace App.ViewModel;

#nullable enable
partial class AvatarView
{
    public object? GetPropertyValue(string propertyName)
    {
        return propertyName switch
        {
            nameof(Name) => Name,
            nameof(Level) => Level,
            _ => default
        };
    }
}
";
        assert_eq!(body(&files[0]), expected);
    }

    #[test]
    fn test_inherited_interface_is_ignored() {
        let provider = type_from_metadata_name(names::PROPERTY_VALUES_PROVIDER);
        let base = TypeSymbol::class("App.ViewModel", "ViewBase").interface(&provider).not_partial().build();
        let derived = TypeSymbol::class("App.ViewModel", "Derived").base(&base).build();
        let collected = collect(&compilation(vec![derived]), &CancellationToken::new()).unwrap();
        assert!(collected.contexts.is_empty());
    }
}
