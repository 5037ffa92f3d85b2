//! Integration tests for timers + FSM + springs
//!
//! These tests verify that:
//! - A state machine can schedule its own follow-up through the timer queue
//! - Stale timers are recognizable and ignored by their owner
//! - Springs and timers can be driven by the same frame clock

use reel_animation::{Spring, SpringConfig};
use reel_core::fsm::{StateMachine, StateTransitions};
use reel_core::timer::TimerQueue;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Overlay {
    Closed,
    Open,
    Closing,
}

enum OverlayEvent {
    Show,
    Dismiss,
    AnimationDone,
}

impl StateTransitions for Overlay {
    type Event = OverlayEvent;

    fn on_event(&self, event: &OverlayEvent) -> Option<Self> {
        match (self, event) {
            (Overlay::Closed, OverlayEvent::Show) => Some(Overlay::Open),
            (Overlay::Open, OverlayEvent::Dismiss) => Some(Overlay::Closing),
            (Overlay::Closing, OverlayEvent::AnimationDone) => Some(Overlay::Closed),
            (Overlay::Closing, OverlayEvent::Show) => Some(Overlay::Open),
            _ => None,
        }
    }
}

/// A dismiss animation schedules its own completion
#[test]
fn test_timer_completes_transition() {
    let mut fsm = StateMachine::new(Overlay::Closed);
    let mut timers = TimerQueue::new();

    fsm.send(&OverlayEvent::Show);
    fsm.send(&OverlayEvent::Dismiss);
    timers.schedule(0.3, OverlayEvent::AnimationDone);

    for _ in 0..30 {
        for event in timers.advance(1.0 / 60.0) {
            fsm.send(&event);
        }
    }

    assert_eq!(*fsm.current(), Overlay::Closed);
    assert_eq!(fsm.history().len(), 3);
}

/// A timer that fires after the state moved on is a no-op
#[test]
fn test_stale_timer_is_noop() {
    let mut fsm = StateMachine::new(Overlay::Closed);
    let mut timers = TimerQueue::new();

    fsm.send(&OverlayEvent::Show);
    fsm.send(&OverlayEvent::Dismiss);
    timers.schedule(0.3, OverlayEvent::AnimationDone);

    // Reopened before the close animation finished
    fsm.send(&OverlayEvent::Show);

    for event in timers.advance(0.5) {
        assert_eq!(fsm.send(&event), None);
    }
    assert_eq!(*fsm.current(), Overlay::Open);
}

/// Springs and timers share one frame clock
#[test]
fn test_spring_settles_before_timer_fires() {
    let mut timers = TimerQueue::new();
    let mut spring = Spring::new(SpringConfig::critically_damped(400.0, 1.0), 30.0);
    spring.set_target(0.0);
    timers.schedule(1.0, "done");

    let mut fired_at = None;
    for frame in 1..=90 {
        spring.step(1.0 / 60.0);
        if !timers.advance(1.0 / 60.0).is_empty() {
            fired_at = Some(frame);
            assert!(spring.is_settled());
        }
    }

    assert_eq!(fired_at, Some(60));
}
