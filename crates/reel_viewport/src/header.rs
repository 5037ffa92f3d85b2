//! Collapsing header
//!
//! Maps the feed's scroll offset to how far the header has collapsed. Pure
//! and stateless: the same offset always yields the same frame.

use reel_animation::Easing;

use crate::config::HeaderConfig;

/// Header presentation for one scroll offset
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeaderFrame {
    /// Eased collapse progress, 0.0 (expanded) to 1.0 (collapsed)
    pub progress: f32,
    pub opacity: f32,
    /// Vertical translation, 0.0 down to `-header_height`
    pub vertical_offset: f32,
}

impl HeaderFrame {
    /// Fully expanded header
    pub const EXPANDED: HeaderFrame = HeaderFrame {
        progress: 0.0,
        opacity: 1.0,
        vertical_offset: 0.0,
    };
}

impl Default for HeaderFrame {
    fn default() -> Self {
        Self::EXPANDED
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HeaderAnimator {
    collapse_distance: f32,
    header_height: f32,
    easing: Easing,
}

impl HeaderAnimator {
    pub fn new(config: &HeaderConfig) -> Self {
        Self {
            collapse_distance: config.collapse_distance,
            header_height: config.header_height,
            easing: config.easing,
        }
    }

    /// Eased collapse progress for a scroll offset
    ///
    /// Overscroll (negative offsets) and non-finite offsets count as fully
    /// expanded; offsets past the collapse distance saturate.
    pub fn progress(&self, offset_from_top: f32) -> f32 {
        if !offset_from_top.is_finite() || offset_from_top <= 0.0 {
            return 0.0;
        }
        let linear = (offset_from_top / self.collapse_distance).clamp(0.0, 1.0);
        self.easing.apply(linear)
    }

    pub fn frame(&self, offset_from_top: f32) -> HeaderFrame {
        let progress = self.progress(offset_from_top);
        HeaderFrame {
            progress,
            opacity: 1.0 - progress,
            vertical_offset: -progress * self.header_height,
        }
    }
}

impl Default for HeaderAnimator {
    fn default() -> Self {
        Self::new(&HeaderConfig::default())
    }
}
