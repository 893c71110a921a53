//! Generator stages.
//!
//! Each stage is split the same way:
//! - `collect` walks the compilation (or the additional files), rejects
//!   candidates that do not have the required shape and snapshots the rest
//!   into value-comparable contexts
//! - [`Stage::emit`] turns one context into generated files
//!
//! Contexts own no host symbols, so the driver can compare them with the
//! previous run and skip emission for unchanged ones.

use std::fmt::Debug;
use std::hash::Hash;

use rowan::GreenNode;
use tokio_util::sync::CancellationToken;

use crate::base::StructuralArray;
use crate::config::RenderOptions;
use crate::diagnostics::Diagnostic;
use crate::error::{Cancelled, Result};
use crate::syntax::render_document;

pub mod attributes;
pub mod bindable;
pub mod command;
pub mod constructor;
pub mod dependency_property;
pub mod endpoints;
pub mod extended_enum;
pub mod field_accessor;
pub mod http_client;
pub mod identity;
pub mod property_values;
pub mod resx;
pub mod service;
pub mod unload_override;
mod well_known;

#[cfg(test)]
pub(crate) mod test_support;

// ============================================================================
// STAGE PLUMBING
// ============================================================================

/// Every stage the driver runs, in run order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeneratorKind {
    Attributes,
    Constructor,
    Service,
    HttpClient,
    DependencyProperty,
    Command,
    Bindable,
    FieldAccessor,
    ExtendedEnum,
    UnloadOverride,
    PropertyValues,
    Resx,
    Endpoints,
    Identity,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 14] = [
        GeneratorKind::Attributes,
        GeneratorKind::Constructor,
        GeneratorKind::Service,
        GeneratorKind::HttpClient,
        GeneratorKind::DependencyProperty,
        GeneratorKind::Command,
        GeneratorKind::Bindable,
        GeneratorKind::FieldAccessor,
        GeneratorKind::ExtendedEnum,
        GeneratorKind::UnloadOverride,
        GeneratorKind::PropertyValues,
        GeneratorKind::Resx,
        GeneratorKind::Endpoints,
        GeneratorKind::Identity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::Attributes => "AttributeGenerator",
            GeneratorKind::Constructor => "ConstructorGenerator",
            GeneratorKind::Service => "ServiceGenerator",
            GeneratorKind::HttpClient => "HttpClientGenerator",
            GeneratorKind::DependencyProperty => "DependencyPropertyGenerator",
            GeneratorKind::Command => "CommandGenerator",
            GeneratorKind::Bindable => "BindableCustomPropertyGenerator",
            GeneratorKind::FieldAccessor => "FieldAccessorGenerator",
            GeneratorKind::ExtendedEnum => "ExtendedEnumGenerator",
            GeneratorKind::UnloadOverride => "UnloadObjectOverrideGenerator",
            GeneratorKind::PropertyValues => "PropertyValuesProviderGenerator",
            GeneratorKind::Resx => "ResxGenerator",
            GeneratorKind::Endpoints => "ApiEndpointsGenerator",
            GeneratorKind::Identity => "IdentityGenerator",
        }
    }
}

/// One source file produced by a stage.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeneratedFile {
    pub hint: String,
    pub text: String,
}

impl GeneratedFile {
    pub fn new(hint: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            hint: hint.into(),
            text: text.into(),
        }
    }
}

/// Contexts found by a stage's `collect`, with the diagnostics raised while
/// finding them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collected<C> {
    pub contexts: StructuralArray<C>,
    pub diagnostics: StructuralArray<Diagnostic>,
}

impl<C> Collected<C> {
    pub fn new(contexts: Vec<C>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            contexts: contexts.into(),
            diagnostics: diagnostics.into(),
        }
    }

    pub fn contexts(contexts: Vec<C>) -> Self {
        Self::new(contexts, Vec::new())
    }
}

impl<C> Default for Collected<C> {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// What emission may look at besides its context.
pub struct EmitContext<'a> {
    pub render: &'a RenderOptions,
    pub cancel: &'a CancellationToken,
}

impl<'a> EmitContext<'a> {
    pub fn new(render: &'a RenderOptions, cancel: &'a CancellationToken) -> Self {
        Self { render, cancel }
    }

    pub fn check(&self) -> std::result::Result<(), Cancelled> {
        Cancelled::check(self.cancel)
    }

    /// Renders `unit` with the generated-file header.
    pub fn document(&self, hint: impl Into<String>, unit: &GreenNode) -> GeneratedFile {
        GeneratedFile::new(hint, render_document(unit, self.render))
    }
}

/// Emission half of a generator stage.
pub trait Stage {
    const KIND: GeneratorKind;

    /// One unit of work. Equal contexts produce equal output.
    type Context: Clone + Debug + Eq + Hash + Send + Sync + 'static;

    fn emit(context: &Self::Context, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>>;
}
