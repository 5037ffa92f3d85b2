//! Reel Headless
//!
//! Deterministic scenario runner for the viewport controller. A scenario is
//! a JSON list of host inputs (scrolls, drags, layout passes, search
//! actions), clock advances and assertions. The runner feeds the inputs to a
//! [`ViewportController`](reel_viewport::ViewportController) on a virtual
//! clock and produces a machine-readable [`HeadlessReport`].
//!
//! ```rust
//! use reel_headless::run_scenario;
//!
//! let outcome = run_scenario(r#"{
//!     "steps": [
//!         { "type": "set_items", "count": 10 },
//!         { "type": "drag", "translation": 150.0 },
//!         { "type": "release" },
//!         { "type": "assert_pull", "state": "activated" },
//!         { "type": "assert_effect_count", "effect": "haptic_medium", "count": 1 }
//!     ]
//! }"#).unwrap();
//! assert!(!outcome.is_failed());
//! ```

pub mod assert;
pub mod report;
pub mod runner;
pub mod runtime;
pub mod scenario;

pub use report::{HeadlessReport, ReportStatus};
pub use runner::{
    run_loaded_scenario, run_scenario, run_scenario_with_config, RunOutcome, ScenarioRunner,
};
pub use runtime::HeadlessRunConfig;
pub use scenario::{EffectKind, ExpectedPull, HeadlessScenario, ScenarioStep};
