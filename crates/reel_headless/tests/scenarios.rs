use reel_headless::{run_scenario, run_scenario_with_config, HeadlessRunConfig, RunOutcome};
use reel_viewport::ViewportConfig;

fn assert_passes(input: &str) {
    let outcome = run_scenario(input).expect("scenario should load");
    if let RunOutcome::Failed { report } = &outcome {
        panic!(
            "{} failed at step {:?}: {}",
            report.scenario.as_deref().unwrap_or("scenario"),
            report.failed_step_index,
            report.message.as_deref().unwrap_or("")
        );
    }
}

#[test]
fn test_pull_activates_search() {
    assert_passes(include_str!("scenarios/pull_activates_search.json"));
}

#[test]
fn test_short_pull_snaps_back() {
    assert_passes(include_str!("scenarios/short_pull_snaps_back.json"));
}

#[test]
fn test_refresh_resets_index() {
    assert_passes(include_str!("scenarios/refresh_resets_index.json"));
}

#[test]
fn test_header_collapse() {
    assert_passes(include_str!("scenarios/header_collapse.json"));
}

#[test]
fn test_overscroll_pull() {
    assert_passes(include_str!("scenarios/overscroll_pull.json"));
}

#[test]
fn test_submit_typed_query() {
    assert_passes(include_str!("scenarios/submit_typed_query.json"));
}

#[test]
fn test_single_card_reports() {
    assert_passes(include_str!("scenarios/single_card_reports.json"));
}

#[test]
fn test_config_changes_outcome() {
    // A longer activation threshold turns the same gesture into a short pull
    let mut config = ViewportConfig::default();
    config.pull.activation_ratio = 1.0;
    let outcome = run_scenario_with_config(
        include_str!("scenarios/pull_activates_search.json"),
        config,
        HeadlessRunConfig::default(),
    )
    .unwrap();

    assert!(outcome.is_failed());
    let report = outcome.report();
    assert_eq!(report.failed_step_index, Some(5));
    assert_eq!(report.code.as_deref(), Some("pull_state_mismatch"));
}
