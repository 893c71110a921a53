//! Additional files read from a project directory on disk.

use std::fs;
use std::path::Path;

use snapgen::GeneratorKind;
use snapgen::diagnostics::codes;
use snapgen::host::AdditionalText;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::helpers::compilation_fixtures::*;
use crate::helpers::run_helpers::*;
use crate::helpers::source_assertions::*;

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (relative, text) in files {
        let path = dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }
    dir
}

/// Every file under `root`, the way the build hands them over.
fn additional_files(root: &Path) -> Vec<AdditionalText> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let text = fs::read_to_string(entry.path()).unwrap();
            AdditionalText::new(entry.path().to_string_lossy().into_owned(), text)
        })
        .collect()
}

fn run_project(dir: &TempDir) -> snapgen::RunResult {
    let project_dir = dir.path().to_string_lossy().into_owned();
    let mut driver = driver();
    driver.set_additional_files(additional_files(dir.path()), &config(&project_dir));
    run(&mut driver)
}

#[test]
fn test_resx_cultures_merge() {
    let dir = project(&[
        ("Resource/Localization/SH.resx", NEUTRAL_STRINGS),
        ("Resource/Localization/SH.zh-Hans.resx", CHINESE_STRINGS),
    ]);
    let result = run_project(&dir);

    assert_hints(
        &result,
        GeneratorKind::Resx,
        &[
            "Snap.Hutao.Resource.Localization.SH.cs",
            "Snap.Hutao.Resource.Localization.SHName.cs",
        ],
    );
    assert_diagnostic_ids(&result, &[]);
    assert_no_error_sources(&result);

    let class = &result.source("Snap.Hutao.Resource.Localization.SH.cs").unwrap().text;
    assert!(class.contains("namespace Snap.Hutao.Resource.Localization;"));
    assert!(class.contains("FormatWelcome"));
}

#[test]
fn test_malformed_resx_reports_and_skips() {
    let dir = project(&[("Resource/Broken.resx", "<root><data name=\"A\">")]);
    let result = run_project(&dir);

    assert_hints(&result, GeneratorKind::Resx, &[]);
    assert_diagnostic_ids(&result, &[codes::RESX_PARSE]);
    assert_no_error_sources(&result);
}

#[test]
fn test_endpoints_and_identity_files() {
    let dir = project(&[
        ("Web/ApiEndpoints.csv", ENDPOINTS),
        ("Model/Primitive/IdentityStructs.json", IDENTITY_STRUCTS),
        ("readme.md", "not an input"),
    ]);
    let result = run_project(&dir);

    assert_hints(&result, GeneratorKind::Endpoints, &["ApiEndpoints.g.cs"]);
    assert_hints(&result, GeneratorKind::Identity, &["AvatarId.g.cs", "WeaponId.g.cs"]);
    assert_no_error_sources(&result);

    let avatar = &result.source("AvatarId.g.cs").unwrap().text;
    assert!(avatar.contains("Avatar identity"));
}

#[test]
fn test_invalid_identity_json() {
    let dir = project(&[("IdentityStructs.json", "{ not json")]);
    let result = run_project(&dir);

    assert_hints(&result, GeneratorKind::Identity, &[]);
    assert_diagnostic_ids(&result, &[codes::IDENTITY_STRUCTS]);
}

#[test]
fn test_oversized_format_index_does_not_stop_the_run() {
    let dir = project(&[
        (
            "Resource/Localization/SH.resx",
            r#"<root><data name="Huge"><value>{99999999999999999999}</value></data></root>"#,
        ),
        ("IdentityStructs.json", IDENTITY_STRUCTS),
    ]);
    let result = run_project(&dir);

    assert_no_error_sources(&result);
    assert_hints(
        &result,
        GeneratorKind::Resx,
        &[
            "Snap.Hutao.Resource.Localization.SH.cs",
            "Snap.Hutao.Resource.Localization.SHName.cs",
        ],
    );
    assert_hints(&result, GeneratorKind::Identity, &["AvatarId.g.cs", "WeaponId.g.cs"]);

    let class = &result.source("Snap.Hutao.Resource.Localization.SH.cs").unwrap().text;
    assert!(class.contains("Huge"));
    assert!(!class.contains("FormatHuge"));
}
