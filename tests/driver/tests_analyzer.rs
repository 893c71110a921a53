//! The analyzer entry point on the driver.

use snapgen::CancellationToken;
use snapgen::diagnostics::codes;
use snapgen::host::{Accessibility, TypeSymbol};

use crate::helpers::compilation_fixtures::*;
use crate::helpers::run_helpers::*;

#[test]
fn test_public_type_reported() {
    let mut driver = driver();
    driver.set_compilation(compilation(vec![
        TypeSymbol::class("Snap.Hutao.View", "MainWindow")
            .accessibility(Accessibility::Public)
            .build(),
        service("Store", 0),
    ]));

    let diagnostics = driver.analyze(&CancellationToken::new()).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].id, codes::TYPE_INTERNAL_OR_PRIVATE);
    assert_eq!(diagnostics[0].location.as_ref().unwrap().path, "MainWindow.cs");
    assert!(diagnostics[0].message.contains("MainWindow"));
}

#[test]
fn test_no_compilation_no_diagnostics() {
    let driver = driver();
    assert!(driver.analyze(&CancellationToken::new()).unwrap().is_empty());
}

#[test]
fn test_analysis_does_not_affect_generation() {
    let mut driver = driver_with(compilation(vec![service("Store", 0)]), Vec::new(), &config("/src/Snap.Hutao"));
    let before = run(&mut driver);
    driver.analyze(&CancellationToken::new()).unwrap();
    let after = run(&mut driver);
    assert_eq!(after.sources, before.sources);
    assert!(after.diagnostics.is_empty());
}
