//! Applied attribute snapshot.

use smol_str::SmolStr;

use super::constant::TypedConstant;
use super::types::TypeArgumentDescriptor;
use crate::base::StructuralArray;
use crate::error::Result;
use crate::host::AttributeData;
use crate::syntax::factory::{ArgumentSyntax, AttributeSyntax};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeDescriptor {
    pub fully_qualified_type_name: SmolStr,
    pub fully_qualified_metadata_name: SmolStr,
    pub type_arguments: StructuralArray<TypeArgumentDescriptor>,
    pub constructor_arguments: StructuralArray<TypedConstant>,
    pub named_arguments: StructuralArray<(SmolStr, TypedConstant)>,
}

impl AttributeDescriptor {
    /// Fails when an argument did not bind to a constant.
    pub fn from_data(data: &AttributeData) -> Result<Self> {
        let constructor_arguments = data
            .constructor_arguments
            .iter()
            .map(TypedConstant::from_constant)
            .collect::<Result<Vec<_>>>()?;
        let named_arguments = data
            .named_arguments
            .iter()
            .map(|(name, value)| Ok((name.clone(), TypedConstant::from_constant(value)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            fully_qualified_type_name: data.class.fully_qualified().into(),
            fully_qualified_metadata_name: data.class.fully_qualified_metadata_name().into(),
            type_arguments: data
                .class
                .type_arguments
                .iter()
                .map(TypeArgumentDescriptor::from_symbol)
                .collect(),
            constructor_arguments: constructor_arguments.into(),
            named_arguments: named_arguments.into(),
        })
    }

    pub fn all_from(data: &[AttributeData]) -> Result<StructuralArray<Self>> {
        Ok(data
            .iter()
            .map(Self::from_data)
            .collect::<Result<Vec<_>>>()?
            .into())
    }

    /// The attribute re-applied with the same arguments.
    pub fn to_syntax(&self) -> AttributeSyntax {
        let positional = self
            .constructor_arguments
            .iter()
            .map(|argument| ArgumentSyntax::new(argument.to_expression()));
        let named = self
            .named_arguments
            .iter()
            .map(|(name, value)| ArgumentSyntax::name_equals(name, value.to_expression()));
        AttributeSyntax::with_arguments(&self.fully_qualified_type_name, positional.chain(named).collect())
    }

    pub fn type_argument(&self, index: usize) -> Option<&TypeArgumentDescriptor> {
        self.type_arguments.as_slice().get(index)
    }

    pub fn constructor_argument(&self, index: usize) -> Option<&TypedConstant> {
        self.constructor_arguments.as_slice().get(index)
    }

    /// Positional argument `index` when it is a string.
    pub fn constructor_string(&self, index: usize) -> Option<&str> {
        self.constructor_argument(index).and_then(TypedConstant::as_str)
    }

    pub fn named_argument(&self, name: &str) -> Option<&TypedConstant> {
        self.named_arguments
            .iter()
            .find(|(argument, _)| argument == name)
            .map(|(_, value)| value)
    }

    /// Named argument `name` when it is a string.
    pub fn named_string(&self, name: &str) -> Option<&str> {
        self.named_argument(name).and_then(TypedConstant::as_str)
    }

    /// Whether `name` was set to exactly `value`.
    pub fn has_named_argument(&self, name: &str, value: bool) -> bool {
        self.named_argument(name).and_then(TypedConstant::as_bool) == Some(value)
    }
}

/// First attribute in `attributes` whose class has `metadata_name`.
pub fn find_attribute<'a>(
    attributes: &'a StructuralArray<AttributeDescriptor>,
    metadata_name: &str,
) -> Option<&'a AttributeDescriptor> {
    attributes
        .iter()
        .find(|attribute| attribute.fully_qualified_metadata_name == metadata_name)
}
