//! Reel Core Runtime
//!
//! This crate provides the foundational primitives for the Reel viewport
//! controller:
//!
//! - **Input Events**: Scroll samples, drag phases and card layout reports
//! - **State Machines**: Typed transition tables with bounded history
//! - **Timers**: Single-threaded scheduled callbacks on a virtual clock
//! - **Observers**: Change listeners for derived state snapshots
//!
//! # Example
//!
//! ```rust
//! use reel_core::timer::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! timers.schedule(0.3, "reenable");
//!
//! assert!(timers.advance(0.1).is_empty());
//! assert_eq!(timers.advance(0.2).as_slice(), &["reenable"]);
//! ```

pub mod events;
pub mod fsm;
pub mod observe;
pub mod timer;

pub use events::{CardPositionReport, DragPhase, InputEvent, ScrollSample};
pub use fsm::{StateMachine, StateTransitions};
pub use observe::{ObserverId, Observers};
pub use timer::{TimerId, TimerQueue};
