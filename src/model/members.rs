//! Field, property, parameter and method descriptors.

use smol_str::SmolStr;

use super::attribute::{AttributeDescriptor, find_attribute};
use crate::base::StructuralArray;
use crate::error::Result;
use crate::host::{Accessibility, FieldSymbol, MethodSymbol, ParameterSymbol, PropertySymbol};
use crate::syntax::factory::{ParameterSyntax, TypeSyntax};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub name: SmolStr,
    pub fully_qualified_type_name: SmolStr,
    pub fully_qualified_type_name_with_nullability: SmolStr,
    pub attributes: StructuralArray<AttributeDescriptor>,
}

impl FieldDescriptor {
    pub fn from_symbol(symbol: &FieldSymbol) -> Result<Self> {
        Ok(Self {
            name: symbol.name.clone(),
            fully_qualified_type_name: symbol.ty.fully_qualified().into(),
            fully_qualified_type_name_with_nullability: symbol
                .ty
                .fully_qualified_with_nullability()
                .into(),
            attributes: AttributeDescriptor::all_from(&symbol.attributes)?,
        })
    }

    pub fn attribute(&self, metadata_name: &str) -> Option<&AttributeDescriptor> {
        find_attribute(&self.attributes, metadata_name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyDescriptor {
    pub name: SmolStr,
    pub fully_qualified_type_name: SmolStr,
    pub fully_qualified_type_name_with_nullability: SmolStr,
    pub type_is_value_type: bool,
    pub type_is_reference_type: bool,
    pub attributes: StructuralArray<AttributeDescriptor>,
    pub declared_accessibility: Accessibility,
    pub getter_accessibility: Option<Accessibility>,
    pub setter_accessibility: Option<Accessibility>,
    /// Type of the first indexer parameter; `None` for ordinary properties.
    pub indexer_parameter: Option<IndexerParameter>,
    pub is_static: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndexerParameter {
    pub fully_qualified_type_name: SmolStr,
    pub is_value_type: bool,
    pub is_reference_type: bool,
}

impl PropertyDescriptor {
    pub fn from_symbol(symbol: &PropertySymbol) -> Result<Self> {
        let indexer_parameter = symbol.parameters.first().map(|parameter| IndexerParameter {
            fully_qualified_type_name: parameter.ty.fully_qualified_with_nullability().into(),
            is_value_type: parameter.ty.is_value_type(),
            is_reference_type: parameter.ty.is_reference_type(),
        });
        Ok(Self {
            name: symbol.name.clone(),
            fully_qualified_type_name: symbol.ty.fully_qualified().into(),
            fully_qualified_type_name_with_nullability: symbol
                .ty
                .fully_qualified_with_nullability()
                .into(),
            type_is_value_type: symbol.ty.is_value_type(),
            type_is_reference_type: symbol.ty.is_reference_type(),
            attributes: AttributeDescriptor::all_from(&symbol.attributes)?,
            declared_accessibility: symbol.accessibility,
            getter_accessibility: symbol.getter.map(|getter| getter.accessibility),
            setter_accessibility: symbol.setter.map(|setter| setter.accessibility),
            indexer_parameter,
            is_static: symbol.is_static,
        })
    }

    pub fn is_indexer(&self) -> bool {
        self.indexer_parameter.is_some()
    }

    pub fn attribute(&self, metadata_name: &str) -> Option<&AttributeDescriptor> {
        find_attribute(&self.attributes, metadata_name)
    }

    pub fn type_syntax(&self) -> TypeSyntax {
        TypeSyntax::parse(&self.fully_qualified_type_name_with_nullability)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterDescriptor {
    pub name: SmolStr,
    pub fully_qualified_type_name: SmolStr,
    pub fully_qualified_type_metadata_name: SmolStr,
    pub fully_qualified_type_name_with_nullability: SmolStr,
}

impl ParameterDescriptor {
    pub fn from_symbol(symbol: &ParameterSymbol) -> Self {
        Self {
            name: symbol.name.clone(),
            fully_qualified_type_name: symbol.ty.fully_qualified().into(),
            fully_qualified_type_metadata_name: symbol.ty.fully_qualified_metadata_name().into(),
            fully_qualified_type_name_with_nullability: symbol
                .ty
                .fully_qualified_with_nullability()
                .into(),
        }
    }

    pub fn to_syntax(&self) -> ParameterSyntax {
        ParameterSyntax::new(
            TypeSyntax::parse(&self.fully_qualified_type_name_with_nullability),
            &self.name,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub name: SmolStr,
    /// Return type display, nullability included.
    pub fully_qualified_return_type_name: SmolStr,
    pub fully_qualified_return_type_metadata_name: SmolStr,
    pub parameters: StructuralArray<ParameterDescriptor>,
    pub is_static: bool,
}

impl MethodDescriptor {
    pub fn from_symbol(symbol: &MethodSymbol) -> Self {
        Self {
            name: symbol.name.clone(),
            fully_qualified_return_type_name: symbol
                .return_type
                .fully_qualified_with_nullability()
                .into(),
            fully_qualified_return_type_metadata_name: symbol
                .return_type
                .fully_qualified_metadata_name()
                .into(),
            parameters: symbol
                .parameters
                .iter()
                .map(ParameterDescriptor::from_symbol)
                .collect(),
            is_static: symbol.is_static,
        }
    }
}

/// A method with the marker attributes applied to it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributedMethodDescriptor {
    pub attributes: StructuralArray<AttributeDescriptor>,
    pub method: MethodDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{AttributeData, ConstantValue, SpecialType, TypeSymbol};

    #[test]
    fn test_property_accessibility_snapshot() {
        let string = TypeSymbol::special(SpecialType::String).annotated();
        let symbol = PropertySymbol::new("Title", &string)
            .setter_accessibility(Accessibility::Private)
            .build();
        let property = PropertyDescriptor::from_symbol(&symbol).unwrap();
        assert_eq!(property.fully_qualified_type_name, "string");
        assert_eq!(property.fully_qualified_type_name_with_nullability, "string?");
        assert_eq!(property.getter_accessibility, Some(Accessibility::Public));
        assert_eq!(property.setter_accessibility, Some(Accessibility::Private));
        assert!(property.type_is_reference_type);
        assert!(!property.is_indexer());
    }

    #[test]
    fn test_indexer_parameter() {
        let int = TypeSymbol::special(SpecialType::Int32);
        let symbol =
            PropertySymbol::indexer(&int, ParameterSymbol::new("index", &int)).get_only().build();
        let property = PropertyDescriptor::from_symbol(&symbol).unwrap();
        let parameter = property.indexer_parameter.as_ref().unwrap();
        assert_eq!(parameter.fully_qualified_type_name, "int");
        assert!(parameter.is_value_type);
        assert_eq!(property.setter_accessibility, None);
    }

    #[test]
    fn test_field_attribute_lookup() {
        let keyed = TypeSymbol::class(
            "Snap.Hutao.Core.DependencyInjection.Annotation",
            "FromKeyedServicesAttribute",
        )
        .build();
        let service = TypeSymbol::interface("App", "IStore").build();
        let symbol = FieldSymbol::new("store", &service)
            .readonly()
            .attribute(AttributeData::new(&keyed).arg(ConstantValue::string("Cloud")))
            .build();
        let field = FieldDescriptor::from_symbol(&symbol).unwrap();
        let attribute = field
            .attribute("Snap.Hutao.Core.DependencyInjection.Annotation.FromKeyedServicesAttribute")
            .unwrap();
        assert_eq!(attribute.constructor_string(0), Some("Cloud"));
    }

    #[test]
    fn test_method_parameters() {
        let provider = TypeSymbol::interface("System", "IServiceProvider").build();
        let symbol = MethodSymbol::constructor("Foo")
            .parameter(ParameterSymbol::new("serviceProvider", &provider))
            .build();
        let method = MethodDescriptor::from_symbol(&symbol);
        assert_eq!(method.parameters[0].fully_qualified_type_metadata_name, "System.IServiceProvider");
        assert_eq!(method.parameters[0].name, "serviceProvider");
        assert_eq!(method.fully_qualified_return_type_name, "void");
    }
}
