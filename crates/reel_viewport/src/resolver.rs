//! Active card resolution
//!
//! Keeps the latest vertical center of every rendered card and picks the
//! one closest to the viewport center. Reports that move a card by no more
//! than the jitter tolerance are dropped, so sub-pixel layout noise never
//! causes a re-resolve.

use reel_core::events::CardPositionReport;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::ResolverConfig;

/// A change of active card
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexTransition {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone)]
pub struct CenterIndexResolver {
    /// index -> last accepted center Y
    centers: FxHashMap<usize, f32>,
    viewport_center_y: f32,
    jitter_tolerance: f32,
    /// While held, resolution is suppressed (reports are still stored)
    held: bool,
}

impl CenterIndexResolver {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            centers: FxHashMap::default(),
            viewport_center_y: config.viewport_center_y,
            jitter_tolerance: config.jitter_tolerance,
            held: false,
        }
    }

    pub fn viewport_center_y(&self) -> f32 {
        self.viewport_center_y
    }

    /// Update the viewport center; returns true if it changed
    pub fn set_viewport_center(&mut self, center_y: f32) -> bool {
        if !center_y.is_finite() || center_y == self.viewport_center_y {
            return false;
        }
        self.viewport_center_y = center_y;
        true
    }

    /// Store one report; returns true if it was accepted
    ///
    /// Reports for indices outside `0..item_count`, non-finite positions and
    /// moves within the jitter tolerance are ignored.
    pub fn report(&mut self, report: CardPositionReport, item_count: usize) -> bool {
        if report.index >= item_count || !report.center_y.is_finite() {
            tracing::trace!("ignoring stale report for card {}", report.index);
            return false;
        }
        match self.centers.get_mut(&report.index) {
            Some(stored) if (report.center_y - *stored).abs() <= self.jitter_tolerance => false,
            Some(stored) => {
                *stored = report.center_y;
                true
            }
            None => {
                self.centers.insert(report.index, report.center_y);
                true
            }
        }
    }

    /// Apply a full layout pass: every on-screen card reports, and cards
    /// missing from the pass are forgotten
    ///
    /// Returns true if the stored map changed.
    pub fn apply_layout(&mut self, reports: &[CardPositionReport], item_count: usize) -> bool {
        let mut changed = false;
        for report in reports {
            changed |= self.report(*report, item_count);
        }

        let reported: FxHashSet<usize> = reports.iter().map(|report| report.index).collect();
        let before = self.centers.len();
        self.centers.retain(|index, _| reported.contains(index));
        changed | (self.centers.len() != before)
    }

    /// Forget a card that is no longer rendered
    pub fn forget(&mut self, index: usize) -> bool {
        self.centers.remove(&index).is_some()
    }

    /// Drop reports for indices that no longer exist
    pub fn retain_below(&mut self, item_count: usize) -> bool {
        let before = self.centers.len();
        self.centers.retain(|index, _| *index < item_count);
        self.centers.len() != before
    }

    /// Last accepted center of a card
    pub fn center_of(&self, index: usize) -> Option<f32> {
        self.centers.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Suppress resolution until [`release`](Self::release)
    pub fn hold(&mut self) {
        self.held = true;
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Card closest to the viewport center, lowest index on ties
    pub fn best_index(&self) -> Option<usize> {
        let center = self.viewport_center_y;
        self.centers
            .iter()
            .map(|(index, y)| (*index, (y - center).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(index, _)| index)
    }

    /// Resolve against the previous active index
    ///
    /// Returns a transition only when the best card differs from
    /// `previous`. Held resolvers and empty maps never transition.
    pub fn resolve(&self, previous: usize) -> Option<IndexTransition> {
        if self.held {
            return None;
        }
        let best = self.best_index()?;
        (best != previous).then_some(IndexTransition {
            from: previous,
            to: best,
        })
    }
}

impl Default for CenterIndexResolver {
    fn default() -> Self {
        Self::new(&ResolverConfig::default())
    }
}
