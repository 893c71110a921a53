//! C# syntax: kinds, lexer, tree factory and renderer.
//!
//! Generated sources are built as rowan green trees through [`factory`] and
//! turned into text by [`render`]. The [`lexer`] tokenizes the type names and
//! member signatures that arrive as strings.

pub mod factory;
mod kind;
pub mod lexer;
pub mod naming;
pub mod render;

pub use kind::{CsLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use render::{render, render_document, render_inline, with_generated_header};
