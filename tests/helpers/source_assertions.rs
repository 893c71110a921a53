//! Assertions over run results with readable failure output.

use snapgen::{GeneratorKind, RunResult};

use super::run_helpers::hints;

pub fn assert_hints(result: &RunResult, generator: GeneratorKind, expected: &[&str]) {
    let actual: Vec<&str> = result
        .sources_of(generator)
        .map(|source| source.hint_name.as_str())
        .collect();
    assert_eq!(
        actual,
        expected,
        "\n{} produced unexpected sources.\nAll sources:\n  {}\n",
        generator.name(),
        hints(result).join("\n  ")
    );
}

pub fn assert_no_error_sources(result: &RunResult) {
    let errors: Vec<String> = result
        .error_sources()
        .map(|source| format!("  {} ({}): {}", source.hint_name, source.generator.name(), source.text))
        .collect();
    assert!(
        errors.is_empty(),
        "Expected no error sources, got {}:\n{}",
        errors.len(),
        errors.join("\n")
    );
}

pub fn assert_diagnostic_ids(result: &RunResult, expected: &[&str]) {
    let actual: Vec<&str> = result.diagnostics.iter().map(|d| d.id).collect();
    assert_eq!(
        actual,
        expected,
        "\nUnexpected diagnostics:\n  {}\n",
        result
            .diagnostics
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n  ")
    );
}
