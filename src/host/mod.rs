//! Host object model: the compiler-side view the generators consume.
//!
//! - [`symbols`] - Resolved types, members, attributes and constants
//! - [`Compilation`] - Syntax trees with their bindings and a type registry
//! - [`CompilationBuilder`] - Synthesizes declaration syntax from symbols
//! - [`AdditionalText`], [`AnalyzerConfigOptions`] - Non-source inputs
//!
//! Nothing here is value-comparable. Generator stages copy what they need
//! into [`crate::model`] descriptors before anything is cached.

mod builder;
mod compilation;
mod display;
mod options;
pub mod symbols;

pub use builder::CompilationBuilder;
pub use compilation::{AttributeCandidate, Compilation, SyntaxCandidate, SyntaxTree};
pub use options::{AdditionalText, AnalyzerConfigOptions, FileOptions};
pub use symbols::{
    AccessorData, Accessibility, AttributeData, ConstantValue, FieldSymbol, MemberSymbol,
    MethodKind, MethodSymbol, ParameterSymbol, Primitive, PropertySymbol, SpecialType, Symbol,
    TypeKind, TypeSymbol,
};
