//! Full runs over compilations built from symbols.

use snapgen::host::AnalyzerConfigOptions;
use snapgen::{CancellationToken, GeneratorDriver, GeneratorKind, GeneratorOptions};

use crate::helpers::compilation_fixtures::{compilation, extended_enum, service};
use crate::helpers::run_helpers::{driver, registrations, run};
use crate::helpers::source_assertions::{assert_hints, assert_no_error_sources};

#[test]
fn test_marker_sources_without_inputs() {
    let mut driver = GeneratorDriver::new(GeneratorOptions::default());
    let result = driver.run(&CancellationToken::new()).unwrap();
    assert_hints(
        &result,
        GeneratorKind::Attributes,
        &[
            "Snap.Hutao.Core.Annotation.Attributes.g.cs",
            "Snap.Hutao.Core.DependencyInjection.Annotation.Attributes.g.cs",
            "Snap.Hutao.Core.DependencyInjection.Annotation.HttpClient.Attributes.g.cs",
            "Snap.Hutao.Resource.Localization.Attributes.g.cs",
            "System.Runtime.CompilerServices.InterceptsLocationAttribute.g.cs",
        ],
    );
    assert_eq!(result.sources.len(), 5);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_marker_sources_can_be_disabled() {
    let result = run(&mut driver());
    assert!(result.sources.is_empty());
}

#[test]
fn test_services_registered_by_lifetime_then_name() {
    let mut driver = driver();
    driver.set_compilation(compilation(vec![
        service("ZetaService", 2),
        service("AlphaService", 2),
        service("CacheService", 0),
        service("Store", 1),
    ]));
    let result = run(&mut driver);
    assert_no_error_sources(&result);
    assert_eq!(
        registrations(&result),
        [
            "services.AddSingleton<global::Snap.Hutao.Service.CacheService>();",
            "services.AddScoped<global::Snap.Hutao.Service.Store>();",
            "services.AddTransient<global::Snap.Hutao.Service.AlphaService>();",
            "services.AddTransient<global::Snap.Hutao.Service.ZetaService>();",
        ]
    );
}

#[test]
fn test_output_independent_of_declaration_order() {
    let types = || {
        vec![
            service("ZetaService", 2),
            extended_enum("QualityType", &["None", "White"]),
            service("AlphaService", 1),
            extended_enum("ElementType", &["Fire", "Water"]),
        ]
    };
    let mut forward = driver();
    forward.set_compilation(compilation(types()));

    let mut reversed_types = types();
    reversed_types.reverse();
    let mut reversed = driver();
    reversed.set_compilation(compilation(reversed_types));

    assert_eq!(run(&mut forward).sources, run(&mut reversed).sources);
}

#[test]
fn test_sources_ordered_by_generator_then_hint() {
    let mut driver = driver();
    driver.set_compilation(compilation(vec![
        extended_enum("QualityType", &["None"]),
        service("Store", 0),
        extended_enum("ElementType", &["Fire"]),
    ]));
    let result = run(&mut driver);

    assert_hints(
        &result,
        GeneratorKind::ExtendedEnum,
        &[
            "Snap.Hutao.Model.Intrinsic.ElementType.g.cs",
            "Snap.Hutao.Model.Intrinsic.QualityType.g.cs",
        ],
    );
    assert!(
        result
            .sources
            .windows(2)
            .all(|pair| (pair[0].generator, &pair[0].hint_name) <= (pair[1].generator, &pair[1].hint_name))
    );
    assert_eq!(result.sources[0].generator, GeneratorKind::Service);
}

#[test]
fn test_every_source_carries_the_generated_header() {
    let mut driver = GeneratorDriver::from_analyzer_config(&AnalyzerConfigOptions::default());
    driver.set_compilation(compilation(vec![
        service("Store", 0),
        extended_enum("ElementType", &["Fire"]),
    ]));
    let result = driver.run(&CancellationToken::new()).unwrap();
    assert!(!result.sources.is_empty());
    for source in &result.sources {
        assert!(
            source
                .text
                .starts_with("// Copyright (c) DGP Studio. All rights reserved.\n"),
            "{} has no header",
            source.hint_name
        );
    }
}

#[test]
fn test_crlf_from_build_properties() {
    let mut config = AnalyzerConfigOptions::default();
    config.set_global("build_property.SnapGenNewLine", "crlf");
    let mut driver = GeneratorDriver::from_analyzer_config(&config);
    driver.set_compilation(compilation(vec![service("Store", 0)]));
    let result = driver.run(&CancellationToken::new()).unwrap();
    let source = result.source("ServiceCollectionExtension.g.cs").unwrap();
    assert!(
        source
            .text
            .starts_with("// Copyright (c) DGP Studio. All rights reserved.\r\n")
    );
}
