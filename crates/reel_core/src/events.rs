//! Input event vocabulary
//!
//! Everything the host feeds into the controller: samples from the scroll
//! surface, phases of the drag recognizer layered on top of it, per-card
//! layout reports and host geometry.

/// One sample from the scroll surface.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScrollSample {
    /// Distance scrolled from the top of the content (negative = overscroll)
    pub offset_from_top: f32,
    /// Whether the user's finger is currently on the surface
    pub is_user_dragging: bool,
}

impl ScrollSample {
    pub fn new(offset_from_top: f32, is_user_dragging: bool) -> Self {
        Self {
            offset_from_top,
            is_user_dragging,
        }
    }

    /// Amount scrolled past the top edge, zero when within content
    pub fn overscroll(&self) -> f32 {
        if self.offset_from_top.is_finite() {
            (-self.offset_from_top).max(0.0)
        } else {
            0.0
        }
    }
}

/// Latest known vertical center of a rendered card.
///
/// `center_y` is expressed in the same coordinate space as the viewport
/// center supplied by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardPositionReport {
    pub index: usize,
    pub center_y: f32,
}

impl CardPositionReport {
    pub fn new(index: usize, center_y: f32) -> Self {
        Self { index, center_y }
    }
}

/// Phase of the explicit drag gesture layered on the scroll surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragPhase {
    /// Cumulative vertical translation since the drag began (positive = down)
    Changed { translation_y: f32 },
    /// Finger lifted
    Ended,
}

/// A raw host input event
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Scroll(ScrollSample),
    Drag(DragPhase),
    /// One layout pass: every card currently on screen
    Layout(Vec<CardPositionReport>),
    /// One card moved; other stored positions are kept
    Position(CardPositionReport),
    /// A single card left the screen
    CardHidden(usize),
    ViewportCenter(f32),
    /// External "scroll to top and refresh" edge
    Refresh,
    /// The host finished a programmatic scroll
    ScrollSettled,
}
