//! # snapgen-base
//!
//! Incremental C# source generators and analyzer rules for Snap.Hutao.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! driver      → salsa inputs, GeneratorDriver, emission cache
//!   ↓
//! generators  → candidate selection, snapshotting and emission per stage
//! analyzer    → SH001 / SH003 / SH007 / SH008 over syntax trees
//!   ↓
//! model       → value-comparable snapshots of host symbols
//!   ↓
//! host        → compilation, symbols, additional files, build metadata
//!   ↓
//! syntax      → C# kinds, lexer, syntax factory, renderer
//!   ↓
//! base        → StructuralArray, pooled builders, metadata names
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → host → model → generators → driver)
// ============================================================================

/// Foundation types: StructuralArray, pooled builders, metadata names
pub mod base;

/// Driver-wide options and the renderer's layout settings
pub mod config;

/// Diagnostics, rule descriptors and their collector
pub mod diagnostics;

/// Error type shared by every stage
pub mod error;

/// C# syntax: kinds, lexer, factory, renderer
pub mod syntax;

/// Compiler-side object model the generators read
pub mod host;

/// Snapshots of host symbols that stages cache and compare
pub mod model;

/// The generator stages
pub mod generators;

/// Analyzer rules
pub mod analyzer;

/// Host integration: salsa database and the generator driver
pub mod driver;

// Re-export the entry points
pub use config::{GeneratorOptions, NewLine, RenderOptions};
pub use diagnostics::{Diagnostic, Location, Severity};
pub use driver::{GeneratedSource, GeneratorDriver, RunResult, RunStats};
pub use error::{Cancelled, GeneratorError, Result};
pub use generators::GeneratorKind;

// Re-export foundation types
pub use base::{StructuralArray, TextRange, TextSize};
pub use tokio_util::sync::CancellationToken;
