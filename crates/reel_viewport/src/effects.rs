//! Side effects emitted alongside each state snapshot
//!
//! The controller never calls into the host directly. Each update returns a
//! list of [`Effect`]s; hosts either match on them or hand the update to a
//! [`ViewportHost`] implementation.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::item::ItemId;
use crate::search::SearchOutcome;
use crate::state::ViewportState;

/// Haptic impact strength
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Light,
    Medium,
}

/// A side effect requested by the controller
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Haptic(Impact),
    /// The active card moved; consumers animate the change
    ActiveIndexChanged { from: usize, to: usize },
    /// The search overlay opened and wants keyboard focus
    FocusSearchInput,
    /// Hand a committed query to the search collaborator
    Search(String),
    /// The search overlay closed
    SearchClosed(SearchOutcome),
    /// Ask the scroll surface to bring an item to the top
    ScrollToItem(ItemId),
    RefreshStarted,
    RefreshFinished,
}

/// Effects produced by a single update
pub type Effects = SmallVec<[Effect; 4]>;

/// Result of feeding one input into the controller
#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    pub state: ViewportState,
    pub effects: Effects,
}

impl Update {
    /// Deliver every effect to `host`, in order
    pub fn dispatch<H: ViewportHost + ?Sized>(&self, host: &mut H) {
        for effect in &self.effects {
            host.apply(effect);
        }
    }
}

/// Host-side receiver for controller effects
///
/// Every method has an empty default so hosts implement only what they
/// render.
pub trait ViewportHost {
    fn haptic(&mut self, _impact: Impact) {}

    fn active_index_changed(&mut self, _from: usize, _to: usize) {}

    fn focus_search_input(&mut self) {}

    fn search(&mut self, _query: &str) {}

    fn search_closed(&mut self, _outcome: &SearchOutcome) {}

    fn scroll_to_item(&mut self, _id: &ItemId) {}

    fn refresh_started(&mut self) {}

    fn refresh_finished(&mut self) {}

    /// Route one effect to the matching callback
    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::Haptic(impact) => self.haptic(*impact),
            Effect::ActiveIndexChanged { from, to } => self.active_index_changed(*from, *to),
            Effect::FocusSearchInput => self.focus_search_input(),
            Effect::Search(query) => self.search(query),
            Effect::SearchClosed(outcome) => self.search_closed(outcome),
            Effect::ScrollToItem(id) => self.scroll_to_item(id),
            Effect::RefreshStarted => self.refresh_started(),
            Effect::RefreshFinished => self.refresh_finished(),
        }
    }
}
