//! Assertion helpers for headless viewport runs.

use reel_viewport::{Effect, PullState, ViewportState};

use crate::scenario::{EffectKind, ExpectedPull};

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn failed(code: &str, message: String) -> Self {
        AssertionResult::Failed {
            code: code.to_string(),
            message,
        }
    }
}

pub fn evaluate_active_index(expected: usize, state: &ViewportState) -> AssertionResult {
    if state.active_index == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "active_index_mismatch",
            format!("expected active index {expected}, got {}", state.active_index),
        )
    }
}

pub fn evaluate_pull(
    expected: ExpectedPull,
    distance: Option<f32>,
    state: &ViewportState,
) -> AssertionResult {
    let matches = matches!(
        (expected, state.pull_state),
        (ExpectedPull::Idle, PullState::Idle)
            | (ExpectedPull::Tracking, PullState::Tracking(_))
            | (ExpectedPull::Activated, PullState::Activated)
    );
    if !matches {
        return AssertionResult::failed(
            "pull_state_mismatch",
            format!("expected {expected:?}, got {:?}", state.pull_state),
        );
    }

    match distance {
        Some(distance) if (state.pull_indicator_distance - distance).abs() > 1e-3 => {
            AssertionResult::failed(
                "pull_distance_mismatch",
                format!(
                    "expected indicator at {distance:.3}, got {:.3}",
                    state.pull_indicator_distance
                ),
            )
        }
        _ => AssertionResult::Passed,
    }
}

pub fn evaluate_header_opacity(
    expected: f32,
    tolerance: f32,
    state: &ViewportState,
) -> AssertionResult {
    let actual = state.header_opacity();
    if (actual - expected).abs() <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "header_opacity_mismatch",
            format!("expected header opacity {expected:.3} ±{tolerance}, got {actual:.3}"),
        )
    }
}

pub fn evaluate_effect_count(
    kind: EffectKind,
    expected: usize,
    effects: &[Effect],
) -> AssertionResult {
    let actual = effects.iter().filter(|effect| kind.matches(effect)).count();
    if actual == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "effect_count_mismatch",
            format!("expected {expected} {kind:?} effect(s), got {actual}"),
        )
    }
}

pub fn evaluate_overlay_open(expected: bool, state: &ViewportState) -> AssertionResult {
    if state.search_open() == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "overlay_mismatch",
            format!("expected overlay open={expected}, got {}", state.search_open()),
        )
    }
}

pub fn evaluate_refreshing(expected: bool, state: &ViewportState) -> AssertionResult {
    if state.is_refreshing == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "refreshing_mismatch",
            format!("expected refreshing={expected}, got {}", state.is_refreshing),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_viewport::Impact;

    #[test]
    fn test_pull_distance_checked_only_when_given() {
        let state = ViewportState {
            pull_state: PullState::Tracking(42.0),
            pull_indicator_distance: 42.0,
            ..ViewportState::default()
        };
        assert_eq!(
            evaluate_pull(ExpectedPull::Tracking, None, &state),
            AssertionResult::Passed
        );
        assert_eq!(
            evaluate_pull(ExpectedPull::Tracking, Some(42.0), &state),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_pull(ExpectedPull::Tracking, Some(10.0), &state),
            AssertionResult::Failed { code, .. } if code == "pull_distance_mismatch"
        ));
        assert!(matches!(
            evaluate_pull(ExpectedPull::Idle, None, &state),
            AssertionResult::Failed { code, .. } if code == "pull_state_mismatch"
        ));
    }

    #[test]
    fn test_effect_count() {
        let effects = [
            Effect::Haptic(Impact::Medium),
            Effect::FocusSearchInput,
            Effect::Haptic(Impact::Medium),
        ];
        assert_eq!(
            evaluate_effect_count(EffectKind::HapticMedium, 2, &effects),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_effect_count(EffectKind::Search, 1, &effects),
            AssertionResult::Failed { .. }
        ));
    }

    #[test]
    fn test_header_opacity_tolerance() {
        let state = ViewportState::default();
        assert_eq!(
            evaluate_header_opacity(0.9995, 1e-3, &state),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_header_opacity(0.5, 1e-3, &state),
            AssertionResult::Failed { .. }
        ));
    }
}
