//! Foundation types for the generator suite.
//!
//! This module provides the low-level pieces every other layer builds on:
//! - [`StructuralArray`] - Value-equality wrapper over an immutable slice
//! - [`PooledBuilder`], [`ArrayPool`] - Pooled, scope-bound append buffers
//! - [`names`] - Registry of well-known metadata names
//!
//! This module has NO dependencies on other snapgen modules except `error`.

pub mod names;
mod pool;
mod structural;

pub(crate) use pool::pool_element;
pub use pool::{ArrayPool, PoolElement, PooledBuilder};
pub use structural::StructuralArray;

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
