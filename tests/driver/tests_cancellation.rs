//! Cancelled runs report nothing and leave the caches as they were.

use snapgen::CancellationToken;

use crate::helpers::compilation_fixtures::*;
use crate::helpers::run_helpers::*;

fn cancelled() -> CancellationToken {
    let cancel = CancellationToken::new();
    cancel.cancel();
    cancel
}

#[test]
fn test_cancelled_run_is_an_error() {
    let mut driver = driver();
    driver.set_compilation(compilation(vec![service("Store", 0)]));
    let error = driver.run(&cancelled()).unwrap_err();
    assert!(error.is_cancelled());
}

#[test]
fn test_run_after_cancel_recomputes() {
    let mut driver = driver();
    driver.set_compilation(compilation(vec![service("Store", 0)]));
    assert!(driver.run(&cancelled()).is_err());

    let result = run(&mut driver);
    assert_eq!(
        registrations(&result),
        ["services.AddSingleton<global::Snap.Hutao.Service.Store>();"]
    );
    assert_eq!(result.stats.reused, 0);
}

#[test]
fn test_cancelled_run_keeps_previous_cache() {
    let mut driver = driver();
    driver.set_compilation(compilation(vec![
        service("Store", 0),
        extended_enum("ElementType", &["Fire"]),
    ]));
    let first = run(&mut driver);

    assert!(driver.run(&cancelled()).is_err());

    let third = run(&mut driver);
    assert_eq!(third.stats.emitted, 0);
    assert_eq!(third.stats.reused, first.stats.emitted);
    assert_eq!(third.sources, first.sources);
}

#[test]
fn test_cancelled_analysis() {
    let mut driver = driver();
    driver.set_compilation(compilation(vec![service("Store", 0)]));
    let error = driver.analyze(&cancelled()).unwrap_err();
    assert!(error.is_cancelled());
}
