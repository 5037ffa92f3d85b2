//! Observable viewport snapshot

use crate::header::HeaderFrame;
use crate::pull::PullState;

/// Everything the rendering layer needs to draw one frame of the feed
///
/// Rebuilt after every input; never mutated in place by the host.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ViewportState {
    /// Card closest to the viewport center
    pub active_index: usize,
    pub item_count: usize,
    pub header: HeaderFrame,
    pub pull_state: PullState,
    pub pull_indicator_distance: f32,
    pub pull_indicator_activated: bool,
    /// Live query of the open search overlay, None when closed
    pub search_query: Option<String>,
    pub is_refreshing: bool,
}

impl ViewportState {
    pub fn header_progress(&self) -> f32 {
        self.header.progress
    }

    pub fn header_opacity(&self) -> f32 {
        self.header.opacity
    }

    pub fn header_vertical_offset(&self) -> f32 {
        self.header.vertical_offset
    }

    pub fn search_open(&self) -> bool {
        self.search_query.is_some()
    }
}
