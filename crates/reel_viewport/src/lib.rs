//! Reel Viewport Controller
//!
//! Drives a vertically scrolling content feed: tracks which card is centered
//! in the viewport, collapses the header as the feed scrolls, and layers a
//! rubber-band pull-to-search gesture on the same scroll surface.
//!
//! The controller is a reducer. Every host input returns an [`Update`]: a new
//! immutable [`ViewportState`] snapshot plus the side effects (haptics, focus
//! requests, scroll requests) the host should perform.
//!
//! # Example
//!
//! ```rust
//! use reel_viewport::prelude::*;
//!
//! let mut viewport = ViewportController::default();
//! viewport.set_items((0..10).map(|i| ContentItem::new(format!("card-{i}"))).collect());
//!
//! // Drag down 150 units at the top of the feed, then let go
//! viewport.on_drag_changed(150.0);
//! let update = viewport.on_drag_ended();
//!
//! assert!(update.state.pull_state.is_activated());
//! assert!(update.effects.contains(&Effect::Haptic(Impact::Medium)));
//! assert!(update.state.search_open());
//! ```

pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod haptics;
pub mod header;
pub mod item;
pub mod pull;
pub mod resolver;
pub mod search;
pub mod state;
pub mod visibility;

pub use config::ViewportConfig;
pub use controller::ViewportController;
pub use effects::{Effect, Effects, Impact, Update, ViewportHost};
pub use error::ConfigError;
pub use item::{ContentItem, ItemId};
pub use pull::{PullGestureController, PullState};
pub use search::{SearchOutcome, SearchOverlayController, SearchOverlaySession};
pub use state::ViewportState;
pub use visibility::{CardVisibility, CardVisibilityMapper};

/// Commonly used types
pub mod prelude {
    pub use crate::config::ViewportConfig;
    pub use crate::controller::ViewportController;
    pub use crate::effects::{Effect, Impact, Update, ViewportHost};
    pub use crate::item::{ContentItem, ItemId};
    pub use crate::pull::PullState;
    pub use crate::state::ViewportState;
    pub use crate::visibility::CardVisibility;
    pub use reel_core::events::{CardPositionReport, DragPhase, InputEvent, ScrollSample};
}
