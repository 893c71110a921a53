//! Driver setup and run shortcuts.

use snapgen::host::{AdditionalText, AnalyzerConfigOptions, Compilation};
use snapgen::{CancellationToken, GeneratorDriver, GeneratorOptions, RunResult};

use super::compilation_fixtures::ASSEMBLY;

/// Build metadata placing resources under `project_dir`.
pub fn config(project_dir: &str) -> AnalyzerConfigOptions {
    let mut config = AnalyzerConfigOptions::default();
    config.set_global("build_property.RootNamespace", ASSEMBLY);
    config.set_global("build_property.ProjectDir", project_dir);
    config
}

/// A driver without the marker attribute sources, to keep results small.
pub fn driver() -> GeneratorDriver {
    GeneratorDriver::new(GeneratorOptions {
        emit_marker_attributes: false,
        ..GeneratorOptions::default()
    })
}

pub fn driver_with(compilation: Compilation, files: Vec<AdditionalText>, config: &AnalyzerConfigOptions) -> GeneratorDriver {
    let mut driver = driver();
    driver.set_compilation(compilation);
    driver.set_additional_files(files, config);
    driver
}

pub fn run(driver: &mut GeneratorDriver) -> RunResult {
    match driver.run(&CancellationToken::new()) {
        Ok(result) => result,
        Err(error) => panic!("generator run failed: {error}"),
    }
}

/// The `services.Add...` lines of the DI registration source.
pub fn registrations(result: &RunResult) -> Vec<String> {
    let source = result
        .source("ServiceCollectionExtension.g.cs")
        .unwrap_or_else(|| panic!("no DI registration source in {:?}", hints(result)));
    source
        .text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("services."))
        .map(String::from)
        .collect()
}

pub fn hints(result: &RunResult) -> Vec<&str> {
    result.sources.iter().map(|source| source.hint_name.as_str()).collect()
}
