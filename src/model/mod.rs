//! Value-comparable snapshots of host symbols.
//!
//! Every generator stage turns the symbols it matched into these descriptors
//! before anything is cached. They own only strings, flags and nested
//! descriptors, so two snapshots of an unchanged declaration compare equal
//! across runs even though the host symbols behind them do not.

mod attribute;
mod constant;
mod members;
mod types;

pub use attribute::{AttributeDescriptor, find_attribute};
pub use constant::{NumericConstant, TypedConstant};
pub use members::{
    AttributedMethodDescriptor, FieldDescriptor, IndexerParameter, MethodDescriptor,
    ParameterDescriptor, PropertyDescriptor,
};
pub use types::{HierarchyDescriptor, TypeArgumentDescriptor, TypeDescriptor};
