//! State Machine Runtime
//!
//! Typed state machines for gesture and overlay interaction states.
//! Supports:
//! - Data-carrying states (e.g. a tracked distance)
//! - Event-driven transitions defined by the state type itself
//! - Bounded transition history for debugging

use std::fmt::Debug;

/// Trait for state types that can handle event transitions
///
/// Implement this trait on your state enum to define how events cause
/// state transitions.
///
/// # Example
///
/// ```
/// use reel_core::fsm::{StateMachine, StateTransitions};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Door {
///     Closed,
///     Open,
/// }
///
/// enum Push {
///     In,
///     Out,
/// }
///
/// impl StateTransitions for Door {
///     type Event = Push;
///
///     fn on_event(&self, event: &Push) -> Option<Self> {
///         match (self, event) {
///             (Door::Closed, Push::In) => Some(Door::Open),
///             (Door::Open, Push::Out) => Some(Door::Closed),
///             _ => None,
///         }
///     }
/// }
///
/// let mut door = StateMachine::new(Door::Closed);
/// assert_eq!(door.send(&Push::In), Some(Door::Open));
/// assert_eq!(door.send(&Push::In), None);
/// ```
pub trait StateTransitions: Clone + PartialEq + Debug {
    type Event;

    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: &Self::Event) -> Option<Self>;
}

/// Number of transitions kept in history
pub const DEFAULT_HISTORY_LIMIT: usize = 32;

/// A state machine instance
#[derive(Debug, Clone)]
pub struct StateMachine<S: StateTransitions> {
    current: S,
    /// History of state transitions (for debugging)
    history: Vec<(S, S)>,
}

impl<S: StateTransitions> StateMachine<S> {
    /// Create a new state machine in the given initial state
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    /// Get the current state
    pub fn current(&self) -> &S {
        &self.current
    }

    /// Send an event, returning the new state if a transition happened
    ///
    /// A transition that produces a state equal to the current one (for
    /// example a tracked distance that did not change) updates nothing and
    /// is not recorded.
    pub fn send(&mut self, event: &S::Event) -> Option<S> {
        let next = self.current.on_event(event)?;
        if next == self.current {
            return Some(next);
        }

        let previous = std::mem::replace(&mut self.current, next.clone());
        tracing::trace!("fsm transition {:?} -> {:?}", previous, next);
        self.history.push((previous, next.clone()));
        if self.history.len() > DEFAULT_HISTORY_LIMIT {
            let excess = self.history.len() - DEFAULT_HISTORY_LIMIT;
            self.history.drain(..excess);
        }
        Some(next)
    }

    /// Get transition history, oldest first
    pub fn history(&self) -> &[(S, S)] {
        &self.history
    }
}

impl<S: StateTransitions + Default> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    enum Press {
        #[default]
        Idle,
        Hovered,
        Pressed,
    }

    enum PointerEvent {
        Enter,
        Leave,
        Down,
        Up,
    }

    impl StateTransitions for Press {
        type Event = PointerEvent;

        fn on_event(&self, event: &PointerEvent) -> Option<Self> {
            match (self, event) {
                (Press::Idle, PointerEvent::Enter) => Some(Press::Hovered),
                (Press::Hovered, PointerEvent::Leave) => Some(Press::Idle),
                (Press::Hovered, PointerEvent::Down) => Some(Press::Pressed),
                (Press::Pressed, PointerEvent::Up) => Some(Press::Hovered),
                (Press::Pressed, PointerEvent::Down) => Some(Press::Pressed),
                _ => None,
            }
        }
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = StateMachine::<Press>::default();
        assert_eq!(*fsm.current(), Press::Idle);

        fsm.send(&PointerEvent::Enter);
        assert_eq!(*fsm.current(), Press::Hovered);

        fsm.send(&PointerEvent::Down);
        assert_eq!(*fsm.current(), Press::Pressed);

        fsm.send(&PointerEvent::Up);
        assert_eq!(*fsm.current(), Press::Hovered);

        fsm.send(&PointerEvent::Leave);
        assert_eq!(*fsm.current(), Press::Idle);
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut fsm = StateMachine::new(Press::Idle);

        // Down is not valid in Idle
        assert_eq!(fsm.send(&PointerEvent::Down), None);
        assert_eq!(*fsm.current(), Press::Idle);
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn test_self_transition_not_recorded() {
        let mut fsm = StateMachine::new(Press::Idle);
        fsm.send(&PointerEvent::Enter);
        fsm.send(&PointerEvent::Down);
        assert_eq!(fsm.send(&PointerEvent::Down), Some(Press::Pressed));
        assert_eq!(fsm.history().len(), 2);
    }

    #[test]
    fn test_history() {
        let mut fsm = StateMachine::new(Press::Idle);

        fsm.send(&PointerEvent::Enter);
        fsm.send(&PointerEvent::Down);

        let history = fsm.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], (Press::Idle, Press::Hovered));
        assert_eq!(history[1], (Press::Hovered, Press::Pressed));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut fsm = StateMachine::new(Press::Idle);
        for _ in 0..20 {
            fsm.send(&PointerEvent::Enter);
            fsm.send(&PointerEvent::Leave);
        }
        assert_eq!(fsm.history().len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(fsm.history()[0], (Press::Idle, Press::Hovered));
        assert_eq!(
            fsm.history()[DEFAULT_HISTORY_LIMIT - 1],
            (Press::Hovered, Press::Idle)
        );
    }
}
