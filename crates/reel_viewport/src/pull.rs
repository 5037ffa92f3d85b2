//! Pull-to-search gesture
//!
//! Two input sources can pull the feed down at its top edge: the scroll
//! surface overscrolling past the first card, and an explicit drag gesture
//! layered on the same surface. Both feed one state machine:
//!
//! ```text
//! Idle ──stretch>0──▶ Tracking(d) ──release, d ≥ threshold──▶ Activated
//!   ▲                     │                                      │
//!   └──release, d < thr───┘                                      │
//!   └───────────────────────────dismiss──────────────────────────┘
//! ```
//!
//! The drag source wins whenever both claim the same instant. Drag
//! translation is damped by the elastic factor, overscroll maps 1:1, and
//! both are capped at `max_pull`.

use reel_animation::Spring;
use reel_core::events::ScrollSample;
use reel_core::fsm::{StateMachine, StateTransitions};
use smallvec::SmallVec;

use crate::config::PullConfig;

/// Pull gesture state
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum PullState {
    #[default]
    Idle,
    /// A pull is in progress with the given distance in `0..=max_pull`
    Tracking(f32),
    /// Released past the threshold; the search overlay owns input
    Activated,
}

impl PullState {
    /// Tracked distance, zero outside `Tracking`
    pub fn distance(&self) -> f32 {
        match self {
            PullState::Tracking(distance) => *distance,
            _ => 0.0,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PullState::Idle)
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self, PullState::Tracking(_))
    }

    pub fn is_activated(&self) -> bool {
        matches!(self, PullState::Activated)
    }
}

/// Normalized signals driving [`PullState`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PullSignal {
    /// New pull distance from the active source
    Stretch(f32),
    /// The active source let go
    Release { activation_distance: f32 },
    /// The overlay opened by activation closed
    Dismiss,
}

impl StateTransitions for PullState {
    type Event = PullSignal;

    fn on_event(&self, event: &PullSignal) -> Option<Self> {
        match (self, event) {
            (PullState::Idle, PullSignal::Stretch(distance)) if *distance > 0.0 => {
                Some(PullState::Tracking(*distance))
            }
            (PullState::Tracking(_), PullSignal::Stretch(distance)) => {
                Some(PullState::Tracking(distance.max(0.0)))
            }
            (
                PullState::Tracking(distance),
                PullSignal::Release {
                    activation_distance,
                },
            ) => {
                if *distance >= *activation_distance {
                    Some(PullState::Activated)
                } else {
                    Some(PullState::Idle)
                }
            }
            (PullState::Activated, PullSignal::Dismiss) => Some(PullState::Idle),
            _ => None,
        }
    }
}

/// Discrete things that happened while handling one input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PullOutcome {
    /// `Idle -> Tracking`
    Started,
    /// The tracked distance reached the activation threshold mid-gesture
    Armed,
    /// Released past the threshold
    Activated,
    /// Released short of the threshold; the indicator snaps back
    Reset,
    /// The activated overlay was dismissed
    Dismissed,
}

pub type PullOutcomes = SmallVec<[PullOutcome; 2]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PullSource {
    Overscroll,
    Drag,
}

/// Lifetime classification of the current drag gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DragSession {
    /// No drag, or a drag that has not moved yet
    Pending,
    /// Began downward at the top of the feed
    Pulling,
    /// Began anywhere else; an ordinary scroll for its whole lifetime
    Ignored,
}

#[derive(Debug)]
pub struct PullGestureController {
    machine: StateMachine<PullState>,
    config: PullConfig,
    source: Option<PullSource>,
    drag: DragSession,
    /// Last scroll sample was at the top of the feed
    at_top: bool,
    input_enabled: bool,
    /// Threshold already crossed during the current gesture
    armed: bool,
    /// Distance the host should render
    indicator: f32,
    snap_back: Option<Spring>,
}

impl PullGestureController {
    pub fn new(config: PullConfig) -> Self {
        Self {
            machine: StateMachine::default(),
            config,
            source: None,
            drag: DragSession::Pending,
            at_top: true,
            input_enabled: true,
            armed: false,
            indicator: 0.0,
            snap_back: None,
        }
    }

    pub fn state(&self) -> PullState {
        *self.machine.current()
    }

    /// Distance the pull indicator should be drawn at
    ///
    /// Follows the tracked distance, holds the release distance while
    /// activated, and animates back to zero after a short release.
    pub fn indicator_distance(&self) -> f32 {
        self.indicator
    }

    pub fn is_activated(&self) -> bool {
        self.state().is_activated()
    }

    pub fn is_snapping_back(&self) -> bool {
        self.snap_back.is_some()
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Past transitions, oldest first
    pub fn history(&self) -> &[(PullState, PullState)] {
        self.machine.history()
    }

    /// Enable or disable pull input
    ///
    /// Disabling cancels a pull in progress without activating.
    pub fn set_input_enabled(&mut self, enabled: bool) -> PullOutcomes {
        let mut out = PullOutcomes::new();
        self.input_enabled = enabled;
        if !enabled && self.state().is_tracking() {
            self.release_with(f32::INFINITY, &mut out);
        }
        out
    }

    fn accepts_input(&self) -> bool {
        self.input_enabled && !self.state().is_activated()
    }

    /// Handle a sample from the scroll surface
    pub fn on_scroll(&mut self, sample: ScrollSample) -> PullOutcomes {
        let mut out = PullOutcomes::new();
        if sample.offset_from_top.is_finite() {
            self.at_top = sample.offset_from_top <= self.config.top_tolerance;
        }
        // An active drag owns the pull
        if !self.accepts_input()
            || self.drag == DragSession::Pulling
            || self.source == Some(PullSource::Drag)
        {
            return out;
        }

        let overscroll = sample.overscroll().min(self.config.max_pull);
        match self.state() {
            PullState::Idle => {
                if sample.is_user_dragging && overscroll > 0.0 {
                    self.source = Some(PullSource::Overscroll);
                    self.stretch(overscroll, &mut out);
                }
            }
            PullState::Tracking(_) => {
                if !sample.is_user_dragging || overscroll <= 0.0 {
                    // Finger lifted or the overscroll ran out: judge the
                    // last tracked distance
                    self.release(&mut out);
                } else {
                    self.stretch(overscroll, &mut out);
                }
            }
            PullState::Activated => {}
        }
        out
    }

    /// Handle a drag update with cumulative vertical translation
    pub fn on_drag_changed(&mut self, translation_y: f32) -> PullOutcomes {
        let mut out = PullOutcomes::new();
        if !translation_y.is_finite() {
            return out;
        }

        match self.drag {
            DragSession::Ignored => return out,
            DragSession::Pending => {
                if translation_y == 0.0 {
                    return out;
                }
                if translation_y < 0.0 || !self.at_top || !self.accepts_input() {
                    tracing::trace!(
                        "drag is not a pull (translation={:.1}, at_top={})",
                        translation_y,
                        self.at_top
                    );
                    self.drag = DragSession::Ignored;
                    return out;
                }
                self.drag = DragSession::Pulling;
                // Takes over from an overscroll pull already in progress
                self.source = Some(PullSource::Drag);
            }
            DragSession::Pulling => {}
        }

        if !self.accepts_input() {
            return out;
        }
        let distance = (translation_y * self.config.drag_elasticity).clamp(0.0, self.config.max_pull);
        self.stretch(distance, &mut out);
        out
    }

    /// Handle the end of the drag gesture
    pub fn on_drag_ended(&mut self) -> PullOutcomes {
        let mut out = PullOutcomes::new();
        let session = std::mem::replace(&mut self.drag, DragSession::Pending);
        if session != DragSession::Pulling {
            return out;
        }

        if self.source == Some(PullSource::Drag) && self.state().is_tracking() {
            self.release(&mut out);
        } else if self.source == Some(PullSource::Drag) {
            self.source = None;
        }
        out
    }

    /// Return from `Activated` to `Idle` once the overlay closed
    pub fn dismiss(&mut self) -> PullOutcomes {
        let mut out = PullOutcomes::new();
        if self.machine.send(&PullSignal::Dismiss).is_some() {
            tracing::debug!("pull dismissed");
            self.indicator = 0.0;
            self.snap_back = None;
            self.source = None;
            self.armed = false;
            out.push(PullOutcome::Dismissed);
        }
        out
    }

    /// Advance the snap-back animation; returns true while animating
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(spring) = self.snap_back.as_mut() else {
            return false;
        };
        spring.step(dt);
        if spring.is_settled() {
            self.indicator = 0.0;
            self.snap_back = None;
            false
        } else {
            self.indicator = spring.value().max(0.0);
            true
        }
    }

    fn stretch(&mut self, distance: f32, out: &mut PullOutcomes) {
        let was_idle = self.state().is_idle();
        let Some(PullState::Tracking(distance)) =
            self.machine.send(&PullSignal::Stretch(distance))
        else {
            return;
        };

        self.snap_back = None;
        self.indicator = distance;
        if was_idle {
            tracing::debug!("pull tracking started ({:?})", self.source);
            out.push(PullOutcome::Started);
        }
        if !self.armed && distance >= self.config.activation_distance() {
            self.armed = true;
            out.push(PullOutcome::Armed);
        }
        tracing::trace!("pull distance {:.1}", distance);
    }

    fn release(&mut self, out: &mut PullOutcomes) {
        self.release_with(self.config.activation_distance(), out);
    }

    fn release_with(&mut self, activation_distance: f32, out: &mut PullOutcomes) {
        let distance = self.state().distance();
        self.source = None;
        self.armed = false;

        match self.machine.send(&PullSignal::Release {
            activation_distance,
        }) {
            Some(PullState::Activated) => {
                tracing::debug!("pull activated at {:.1}", distance);
                self.indicator = distance;
                out.push(PullOutcome::Activated);
            }
            Some(PullState::Idle) => {
                tracing::debug!("pull released short at {:.1}", distance);
                self.start_snap_back(distance);
                out.push(PullOutcome::Reset);
            }
            _ => {}
        }
    }

    fn start_snap_back(&mut self, from: f32) {
        if from <= 0.0 {
            self.indicator = 0.0;
            self.snap_back = None;
            return;
        }
        let mut spring = Spring::new(self.config.snap_back, from);
        spring.set_target(0.0);
        self.indicator = from;
        self.snap_back = Some(spring);
    }
}

impl Default for PullGestureController {
    fn default() -> Self {
        Self::new(PullConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn settle(pull: &mut PullGestureController) {
        for _ in 0..120 {
            pull.tick(1.0 / 60.0);
        }
    }

    #[test]
    fn test_drag_past_threshold_activates() {
        let mut pull = PullGestureController::default();

        let out = pull.on_drag_changed(150.0);
        assert_eq!(out.as_slice(), &[PullOutcome::Started, PullOutcome::Armed]);
        assert!(approx(pull.state().distance(), 90.0));

        let out = pull.on_drag_ended();
        assert_eq!(out.as_slice(), &[PullOutcome::Activated]);
        assert_eq!(pull.state(), PullState::Activated);
        assert!(approx(pull.indicator_distance(), 90.0));
    }

    #[test]
    fn test_short_drag_resets_and_snaps_back() {
        let mut pull = PullGestureController::default();

        pull.on_drag_changed(50.0);
        assert!(approx(pull.state().distance(), 30.0));

        let out = pull.on_drag_ended();
        assert_eq!(out.as_slice(), &[PullOutcome::Reset]);
        assert_eq!(pull.state(), PullState::Idle);
        assert!(approx(pull.indicator_distance(), 30.0));
        assert!(pull.is_snapping_back());

        assert!(pull.tick(1.0 / 60.0));
        assert!(pull.indicator_distance() < 30.0);
        settle(&mut pull);
        assert_eq!(pull.indicator_distance(), 0.0);
        assert!(!pull.is_snapping_back());
    }

    #[test]
    fn test_drag_is_capped_at_max_pull() {
        let mut pull = PullGestureController::default();
        pull.on_drag_changed(1000.0);
        assert_eq!(pull.state(), PullState::Tracking(100.0));
    }

    #[test]
    fn test_release_just_below_threshold() {
        let mut pull = PullGestureController::default();
        pull.on_scroll(ScrollSample::new(-79.9, true));
        assert_eq!(pull.state(), PullState::Tracking(79.9));

        let out = pull.on_scroll(ScrollSample::new(-79.9, false));
        assert_eq!(out.as_slice(), &[PullOutcome::Reset]);
        assert_eq!(pull.state(), PullState::Idle);
    }

    #[test]
    fn test_release_exactly_at_threshold() {
        let mut pull = PullGestureController::default();
        pull.on_scroll(ScrollSample::new(-80.0, true));
        let out = pull.on_scroll(ScrollSample::new(-70.0, false));
        assert_eq!(out.as_slice(), &[PullOutcome::Activated]);
    }

    #[test]
    fn test_activation_is_single_fire() {
        let mut pull = PullGestureController::default();
        let mut outcomes = Vec::new();
        for translation in [100.0, 140.0, 160.0, 110.0, 150.0, 166.0] {
            outcomes.extend(pull.on_drag_changed(translation));
        }
        outcomes.extend(pull.on_drag_ended());
        outcomes.extend(pull.on_drag_ended());

        let armed = outcomes.iter().filter(|o| **o == PullOutcome::Armed).count();
        let activated = outcomes
            .iter()
            .filter(|o| **o == PullOutcome::Activated)
            .count();
        assert_eq!(armed, 1);
        assert_eq!(activated, 1);
    }

    #[test]
    fn test_overscroll_maps_one_to_one() {
        let mut pull = PullGestureController::default();
        let out = pull.on_scroll(ScrollSample::new(-42.0, true));
        assert_eq!(out.as_slice(), &[PullOutcome::Started]);
        assert_eq!(pull.state(), PullState::Tracking(42.0));

        pull.on_scroll(ScrollSample::new(-250.0, true));
        assert_eq!(pull.state(), PullState::Tracking(100.0));
    }

    #[test]
    fn test_momentum_overscroll_is_not_a_pull() {
        let mut pull = PullGestureController::default();
        pull.on_scroll(ScrollSample::new(-30.0, false));
        assert_eq!(pull.state(), PullState::Idle);
    }

    #[test]
    fn test_overscroll_returning_to_zero_past_threshold_activates() {
        let mut pull = PullGestureController::default();
        pull.on_scroll(ScrollSample::new(-90.0, true));
        let out = pull.on_scroll(ScrollSample::new(0.0, true));
        assert_eq!(out.as_slice(), &[PullOutcome::Activated]);
        assert_eq!(pull.state(), PullState::Activated);
        assert!(approx(pull.indicator_distance(), 90.0));
    }

    #[test]
    fn test_overscroll_returning_to_zero_short_resets() {
        let mut pull = PullGestureController::default();
        pull.on_scroll(ScrollSample::new(-79.9, true));
        let out = pull.on_scroll(ScrollSample::new(12.0, true));
        assert_eq!(out.as_slice(), &[PullOutcome::Reset]);
        assert_eq!(pull.state(), PullState::Idle);
        assert!(approx(pull.indicator_distance(), 79.9));
        assert!(pull.is_snapping_back());
    }

    #[test]
    fn test_drag_takes_precedence_over_overscroll() {
        let mut pull = PullGestureController::default();
        pull.on_scroll(ScrollSample::new(-50.0, true));
        assert_eq!(pull.state(), PullState::Tracking(50.0));

        pull.on_drag_changed(100.0);
        assert!(approx(pull.state().distance(), 60.0));

        // The surface keeps reporting overscroll; the drag still owns the pull
        pull.on_scroll(ScrollSample::new(-30.0, true));
        assert!(approx(pull.state().distance(), 60.0));
        pull.on_scroll(ScrollSample::new(-30.0, false));
        assert!(pull.state().is_tracking());

        pull.on_drag_ended();
        assert_eq!(pull.state(), PullState::Idle);
    }

    #[test]
    fn test_drag_away_from_top_is_ignored() {
        let mut pull = PullGestureController::default();
        pull.on_scroll(ScrollSample::new(200.0, true));

        assert!(pull.on_drag_changed(150.0).is_empty());
        assert_eq!(pull.state(), PullState::Idle);

        // Reaching the top mid-gesture does not turn it into a pull
        pull.on_scroll(ScrollSample::new(0.0, true));
        assert!(pull.on_drag_changed(200.0).is_empty());
        assert!(pull.on_drag_ended().is_empty());
    }

    #[test]
    fn test_upward_drag_is_ignored() {
        let mut pull = PullGestureController::default();
        pull.on_drag_changed(0.0);
        pull.on_drag_changed(-20.0);
        pull.on_drag_changed(150.0);
        assert_eq!(pull.state(), PullState::Idle);
        pull.on_drag_ended();

        // The next gesture is judged afresh
        pull.on_drag_changed(20.0);
        assert!(pull.state().is_tracking());
    }

    #[test]
    fn test_tap_is_safe_noop() {
        let mut pull = PullGestureController::default();
        pull.on_drag_changed(2.0);
        let out = pull.on_drag_ended();
        assert_eq!(out.as_slice(), &[PullOutcome::Reset]);
        assert_eq!(pull.state(), PullState::Idle);
        settle(&mut pull);
        assert_eq!(pull.indicator_distance(), 0.0);
    }

    #[test]
    fn test_activated_ignores_input_until_dismissed() {
        let mut pull = PullGestureController::default();
        pull.on_drag_changed(150.0);
        pull.on_drag_ended();
        assert!(pull.is_activated());

        assert!(pull.on_scroll(ScrollSample::new(-60.0, true)).is_empty());
        assert!(pull.on_drag_changed(100.0).is_empty());
        assert!(pull.on_drag_ended().is_empty());
        assert!(pull.is_activated());

        assert_eq!(pull.dismiss().as_slice(), &[PullOutcome::Dismissed]);
        assert_eq!(pull.state(), PullState::Idle);
        assert_eq!(pull.indicator_distance(), 0.0);
        assert!(pull.dismiss().is_empty());
    }

    #[test]
    fn test_disabled_input_blocks_and_cancels() {
        let mut pull = PullGestureController::default();
        pull.on_drag_changed(150.0);

        let out = pull.set_input_enabled(false);
        assert_eq!(out.as_slice(), &[PullOutcome::Reset]);
        assert_eq!(pull.state(), PullState::Idle);
        pull.on_drag_ended();

        pull.on_drag_changed(150.0);
        assert_eq!(pull.state(), PullState::Idle);
        pull.on_drag_ended();

        pull.set_input_enabled(true);
        pull.on_drag_changed(150.0);
        assert!(pull.state().is_tracking());
    }

    #[test]
    fn test_history_records_lifecycle() {
        let mut pull = PullGestureController::default();
        pull.on_drag_changed(150.0);
        pull.on_drag_ended();
        pull.dismiss();

        let history = pull.history();
        assert_eq!(history.len(), 3);
        assert!(history[0].0.is_idle() && history[0].1.is_tracking());
        assert_eq!(history[1].1, PullState::Activated);
        assert_eq!(history[2], (PullState::Activated, PullState::Idle));
    }
}
