//! Reuse of emitted output across runs.

use snapgen::GeneratorKind;
use snapgen::host::{AdditionalText, AnalyzerConfigOptions};

use crate::helpers::compilation_fixtures::*;
use crate::helpers::run_helpers::*;
use crate::helpers::source_assertions::*;

fn files(identity: &str) -> Vec<AdditionalText> {
    vec![
        AdditionalText::new("/src/Snap.Hutao/Web/ApiEndpoints.csv", ENDPOINTS),
        AdditionalText::new("/src/Snap.Hutao/Model/IdentityStructs.json", identity),
    ]
}

#[test]
fn test_unchanged_inputs_reuse_everything() {
    let mut driver = driver();
    driver.set_compilation(compilation(vec![
        service("Store", 0),
        extended_enum("ElementType", &["Fire", "Water"]),
    ]));

    let first = run(&mut driver);
    assert!(first.stats.emitted > 0);
    assert_eq!(first.stats.reused, 0);

    let second = run(&mut driver);
    assert_eq!(second.stats.emitted, 0);
    assert_eq!(second.stats.reused, first.stats.emitted);
    assert_eq!(second.sources, first.sources);
}

#[test]
fn test_new_type_emits_only_its_output() {
    let mut driver = driver();
    driver.set_compilation(compilation(vec![
        service("Store", 0),
        extended_enum("ElementType", &["Fire", "Water"]),
    ]));
    let first = run(&mut driver);

    driver.set_compilation(compilation(vec![
        service("Store", 0),
        extended_enum("ElementType", &["Fire", "Water"]),
        extended_enum("QualityType", &["White", "Green"]),
    ]));
    let second = run(&mut driver);

    assert_eq!(second.stats.emitted, 1);
    assert_eq!(second.stats.reused, first.stats.emitted);
    assert_hints(
        &second,
        GeneratorKind::ExtendedEnum,
        &[
            "Snap.Hutao.Model.Intrinsic.ElementType.g.cs",
            "Snap.Hutao.Model.Intrinsic.QualityType.g.cs",
        ],
    );
}

#[test]
fn test_changed_service_reemits_registrations() {
    let mut driver = driver();
    driver.set_compilation(compilation(vec![service("Store", 0)]));
    run(&mut driver);

    driver.set_compilation(compilation(vec![service("Store", 2)]));
    let second = run(&mut driver);

    assert_eq!(second.stats.emitted, 1);
    assert_eq!(
        registrations(&second),
        ["services.AddTransient<global::Snap.Hutao.Service.Store>();"]
    );
}

#[test]
fn test_edited_file_emits_only_new_entries() {
    let config = AnalyzerConfigOptions::default();
    let mut driver = driver();
    driver.set_additional_files(files(IDENTITY_STRUCTS), &config);
    let first = run(&mut driver);
    assert_eq!(first.stats.emitted, 3);

    let edited = r#"[
  { "Name": "AvatarId", "Documentation": "Avatar identity" },
  { "Name": "WeaponId" },
  { "Name": "MaterialId" }
]"#;
    driver.set_additional_files(files(edited), &config);
    let second = run(&mut driver);

    assert_eq!(second.stats.emitted, 1);
    assert_eq!(second.stats.reused, 3);
    assert_hints(
        &second,
        GeneratorKind::Identity,
        &["AvatarId.g.cs", "MaterialId.g.cs", "WeaponId.g.cs"],
    );
    assert_no_error_sources(&second);
}

#[test]
fn test_removed_file_drops_its_sources() {
    let config = AnalyzerConfigOptions::default();
    let mut driver = driver();
    driver.set_additional_files(files(IDENTITY_STRUCTS), &config);
    run(&mut driver);

    driver.set_additional_files(
        vec![AdditionalText::new("/src/Snap.Hutao/Web/ApiEndpoints.csv", ENDPOINTS)],
        &config,
    );
    let second = run(&mut driver);

    assert_hints(&second, GeneratorKind::Identity, &[]);
    assert_hints(&second, GeneratorKind::Endpoints, &["ApiEndpoints.g.cs"]);
    assert_eq!(second.stats.reused, 1);
}
