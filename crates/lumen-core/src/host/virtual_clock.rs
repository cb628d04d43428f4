//! Scheduler driven by an explicitly advanced clock.
//!
//! Tests advance it by exact amounts; the terminal front end advances it by
//! the real time elapsed between frames. Timers fire in deadline order, ties
//! in scheduling order, and the clock reads the timer's deadline while its
//! callback runs.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use super::{Scheduler, TimerCallback, TimerId};

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), TimerCallback>,
    deadlines: HashMap<u64, Duration>,
}

#[derive(Default)]
pub struct VirtualScheduler {
    state: RefCell<ClockState>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward, firing every timer that comes due.
    ///
    /// Timers scheduled by callbacks during the advance fire too if their
    /// deadline falls inside the window. Returns the number fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.borrow().now.saturating_add(by);
        self.advance_to(target)
    }

    /// Move the clock to an absolute time (never backwards)
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;
        loop {
            let due = {
                let mut state = self.state.borrow_mut();
                let next_key = state
                    .queue
                    .keys()
                    .next()
                    .copied()
                    .filter(|(deadline, _)| *deadline <= target);
                match next_key {
                    Some(key) => {
                        let callback = state.queue.remove(&key);
                        state.deadlines.remove(&key.1);
                        state.now = state.now.max(key.0);
                        callback
                    }
                    None => {
                        state.now = state.now.max(target);
                        None
                    }
                }
            };

            match due {
                Some(callback) => {
                    callback();
                    fired += 1;
                }
                None => return fired,
            }
        }
    }

    /// Number of timers waiting to fire
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state.borrow().queue.keys().next().map(|(deadline, _)| *deadline)
    }
}

impl Scheduler for VirtualScheduler {
    fn now(&self) -> Duration {
        self.state.borrow().now
    }

    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let deadline = state.now.saturating_add(delay);
        state.queue.insert((deadline, id), callback);
        state.deadlines.insert(id, deadline);
        TimerId(id)
    }

    fn cancel(&self, id: TimerId) {
        let mut state = self.state.borrow_mut();
        if let Some(deadline) = state.deadlines.remove(&id.0) {
            state.queue.remove(&(deadline, id.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> TimerCallback) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let make = move |name: &'static str| -> TimerCallback {
            let l = l.clone();
            Box::new(move || l.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let clock = VirtualScheduler::new();
        let (log, cb) = recorder();
        clock.schedule(Duration::from_millis(20), cb("b"));
        clock.schedule(Duration::from_millis(10), cb("a"));
        clock.schedule(Duration::from_millis(20), cb("c"));

        assert_eq!(clock.advance(Duration::from_millis(15)), 1);
        assert_eq!(*log.borrow(), vec!["a"]);
        assert_eq!(clock.now(), Duration::from_millis(15));

        clock.advance(Duration::from_millis(5));
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_cancel_prevents_fire() {
        let clock = VirtualScheduler::new();
        let (log, cb) = recorder();
        let id = clock.schedule(Duration::from_millis(5), cb("x"));
        clock.cancel(id);
        clock.cancel(id);
        clock.advance(Duration::from_millis(10));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_callback_can_reschedule_within_window() {
        let clock = Rc::new(VirtualScheduler::new());
        let hits = Rc::new(RefCell::new(Vec::new()));

        let c = clock.clone();
        let h = hits.clone();
        clock.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                h.borrow_mut().push(c.now());
                let h2 = h.clone();
                let c2 = c.clone();
                c.schedule(
                    Duration::from_millis(10),
                    Box::new(move || h2.borrow_mut().push(c2.now())),
                );
            }),
        );

        clock.advance(Duration::from_millis(25));
        assert_eq!(
            *hits.borrow(),
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
        assert_eq!(clock.now(), Duration::from_millis(25));
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let clock = VirtualScheduler::new();
        let (log, cb) = recorder();
        clock.schedule(Duration::ZERO, cb("now"));
        assert!(log.borrow().is_empty());
        clock.advance(Duration::ZERO);
        assert_eq!(*log.borrow(), vec!["now"]);
    }
}
