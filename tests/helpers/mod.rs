//! Shared fixtures and assertions for the integration suites.

pub mod compilation_fixtures;
pub mod run_helpers;
pub mod source_assertions;
