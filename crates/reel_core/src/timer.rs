//! Timer queue
//!
//! Scheduled callbacks for a single-threaded event loop. Time is virtual:
//! the queue only moves forward when the host calls [`TimerQueue::advance`]
//! from its frame clock, so replays and tests are deterministic.
//!
//! Timers carry a payload instead of a closure. The owner decides what a
//! fired payload means, and is expected to treat payloads whose triggering
//! state has since changed as no-ops.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

/// Slack applied when comparing deadlines, absorbs f32 frame deltas
const DEADLINE_EPSILON: f64 = 1e-6;

#[derive(Debug)]
struct Pending<T> {
    deadline: f64,
    /// Insertion order, breaks ties between equal deadlines
    seq: u64,
    payload: T,
}

/// Queue of pending timers keyed by [`TimerId`]
#[derive(Debug)]
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, Pending<T>>,
    /// Current virtual time in seconds
    now: f64,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            now: 0.0,
            next_seq: 0,
        }
    }

    /// Current virtual time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule `payload` to fire `after` seconds from now
    ///
    /// Negative or non-finite delays fire on the next advance.
    pub fn schedule(&mut self, after: f32, payload: T) -> TimerId {
        let delay = if after.is_finite() {
            after.max(0.0) as f64
        } else {
            0.0
        };
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Pending {
            deadline: self.now + delay,
            seq,
            payload,
        })
    }

    /// Cancel a pending timer, returning its payload if it had not fired
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|pending| pending.payload)
    }

    /// Advance virtual time by `dt` seconds and return every payload that
    /// came due, ordered by deadline then by scheduling order
    pub fn advance(&mut self, dt: f32) -> SmallVec<[T; 4]> {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt as f64;
        }

        let now = self.now + DEADLINE_EPSILON;
        let mut due: SmallVec<[(f64, u64, TimerId); 4]> = self
            .timers
            .iter()
            .filter(|(_, pending)| pending.deadline <= now)
            .map(|(id, pending)| (pending.deadline, pending.seq, id))
            .collect();

        if due.is_empty() {
            return SmallVec::new();
        }

        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        tracing::trace!("{} timer(s) due at t={:.3}", due.len(), self.now);

        due.into_iter()
            .filter_map(|(_, _, id)| self.timers.remove(id))
            .map(|pending| pending.payload)
            .collect()
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Check if no timers are pending
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_after_delay() {
        let mut timers = TimerQueue::new();
        timers.schedule(1.0, "refresh");

        assert!(timers.advance(0.5).is_empty());
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.advance(0.5).as_slice(), &["refresh"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_frame_sized_steps_reach_deadline() {
        let mut timers = TimerQueue::new();
        timers.schedule(0.3, 7u32);

        let mut fired = Vec::new();
        for _ in 0..18 {
            fired.extend(timers.advance(1.0 / 60.0));
        }
        // 18 frames at 60fps is exactly 0.3s
        assert_eq!(fired, vec![7]);
    }

    #[test]
    fn test_due_order_is_deadline_then_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(0.3, "b");
        timers.schedule(0.1, "a");
        timers.schedule(0.3, "c");

        assert_eq!(timers.advance(1.0).as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(0.3, 1);
        timers.schedule(0.5, 2);

        assert_eq!(timers.cancel(id), Some(1));
        assert_eq!(timers.cancel(id), None);
        assert_eq!(timers.advance(1.0).as_slice(), &[2]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_invalid_delays_fire_on_next_advance() {
        let mut timers = TimerQueue::new();
        timers.schedule(-1.0, 'n');
        timers.schedule(f32::NAN, 'x');

        assert_eq!(timers.advance(0.0).as_slice(), &['n', 'x']);
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let mut timers: TimerQueue<()> = TimerQueue::new();
        timers.advance(0.5);
        timers.advance(-10.0);
        assert!((timers.now() - 0.5).abs() < 1e-9);
    }
}
