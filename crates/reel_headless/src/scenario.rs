//! Scenario definition for headless viewport runs.

use anyhow::{Context, Result};
use reel_viewport::{Effect, Impact};
use serde::Deserialize;
use std::path::Path;

/// Sequence of scripted host inputs and assertions.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid scenario {}", path.display()))
    }
}

/// One scripted step. Inputs mirror the controller's API; `wait` and `tick`
/// advance the virtual clock; `assert_*` steps check the latest snapshot or
/// the effects emitted so far.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Replace the feed with `count` items named `item-0`, `item-1`, ...
    SetItems { count: usize },
    Scroll {
        offset: f32,
        #[serde(default)]
        dragging: bool,
    },
    Drag { translation: f32 },
    Release,
    /// Full layout pass as `[index, center_y]` pairs
    Layout { cards: Vec<(usize, f32)> },
    /// One card moved, other positions kept
    Position { index: usize, center_y: f32 },
    CardHidden { index: usize },
    ViewportCenter { y: f32 },
    ScrollToTop { id: String },
    Refresh,
    ScrollSettled,
    SetQuery { text: String },
    /// Submit `query`, or the typed text when omitted
    Submit {
        #[serde(default)]
        query: Option<String>,
    },
    Cancel,
    Wait { ms: u64 },
    Tick { frames: u32 },
    AssertActiveIndex { index: usize },
    AssertPull {
        state: ExpectedPull,
        #[serde(default)]
        distance: Option<f32>,
    },
    AssertHeaderOpacity {
        value: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    AssertEffectCount { effect: EffectKind, count: usize },
    AssertOverlayOpen { open: bool },
    AssertRefreshing { refreshing: bool },
}

fn default_tolerance() -> f32 {
    1e-3
}

/// Pull state without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedPull {
    Idle,
    Tracking,
    Activated,
}

/// Effect variant selector for `assert_effect_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    HapticLight,
    HapticMedium,
    ActiveIndexChanged,
    FocusSearchInput,
    Search,
    SearchClosed,
    ScrollToItem,
    RefreshStarted,
    RefreshFinished,
}

impl EffectKind {
    pub fn matches(self, effect: &Effect) -> bool {
        match (self, effect) {
            (EffectKind::HapticLight, Effect::Haptic(Impact::Light)) => true,
            (EffectKind::HapticMedium, Effect::Haptic(Impact::Medium)) => true,
            (EffectKind::ActiveIndexChanged, Effect::ActiveIndexChanged { .. }) => true,
            (EffectKind::FocusSearchInput, Effect::FocusSearchInput) => true,
            (EffectKind::Search, Effect::Search(_)) => true,
            (EffectKind::SearchClosed, Effect::SearchClosed(_)) => true,
            (EffectKind::ScrollToItem, Effect::ScrollToItem(_)) => true,
            (EffectKind::RefreshStarted, Effect::RefreshStarted) => true,
            (EffectKind::RefreshFinished, Effect::RefreshFinished) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let scenario = HeadlessScenario::from_json(
            r#"{
                "name": "pull",
                "steps": [
                    { "type": "set_items", "count": 3 },
                    { "type": "scroll", "offset": -20.0 },
                    { "type": "layout", "cards": [[0, 120.0], [1, 420.0]] },
                    { "type": "assert_pull", "state": "tracking" },
                    { "type": "assert_effect_count", "effect": "haptic_medium", "count": 0 },
                    { "type": "assert_header_opacity", "value": 1.0 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(scenario.name.as_deref(), Some("pull"));
        assert_eq!(scenario.steps.len(), 6);
        assert!(matches!(
            scenario.steps[1],
            ScenarioStep::Scroll { dragging: false, .. }
        ));
        assert!(matches!(
            &scenario.steps[2],
            ScenarioStep::Layout { cards } if cards == &vec![(0, 120.0), (1, 420.0)]
        ));
        assert!(matches!(
            scenario.steps[5],
            ScenarioStep::AssertHeaderOpacity { tolerance, .. } if tolerance == 1e-3
        ));
    }

    #[test]
    fn test_submit_query_is_optional() {
        let scenario = HeadlessScenario::from_json(
            r#"{ "steps": [
                { "type": "submit" },
                { "type": "submit", "query": "tide" },
                { "type": "position", "index": 2, "center_y": 390.0 }
            ] }"#,
        )
        .unwrap();

        assert!(matches!(scenario.steps[0], ScenarioStep::Submit { query: None }));
        assert!(matches!(
            &scenario.steps[1],
            ScenarioStep::Submit { query: Some(q) } if q == "tide"
        ));
        assert!(matches!(
            scenario.steps[2],
            ScenarioStep::Position { index: 2, center_y } if center_y == 390.0
        ));
    }

    #[test]
    fn test_unknown_step_rejected() {
        let err = HeadlessScenario::from_json(r#"{ "steps": [{ "type": "explode" }] }"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_effect_kind_matches_variant() {
        assert!(EffectKind::HapticMedium.matches(&Effect::Haptic(Impact::Medium)));
        assert!(!EffectKind::HapticMedium.matches(&Effect::Haptic(Impact::Light)));
        assert!(EffectKind::ActiveIndexChanged.matches(&Effect::ActiveIndexChanged { from: 0, to: 1 }));
        assert!(!EffectKind::Search.matches(&Effect::RefreshStarted));
    }
}
