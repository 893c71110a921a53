//! Driver tests
//!
//! End-to-end runs through `GeneratorDriver`:
//! - Output ordering and determinism
//! - Emission reuse across runs
//! - Cancellation
//! - Additional files read from disk
//! - Analyzer entry point

pub mod tests_additional_files;
pub mod tests_analyzer;
pub mod tests_cancellation;
pub mod tests_end_to_end;
pub mod tests_incremental;
