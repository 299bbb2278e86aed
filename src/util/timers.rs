//! Timer scheduling for the relay view.
//!
//! DESIGN
//! ======
//! Timers do not carry closures into controller state. A scheduler hands
//! back a [`TimerId`] and later delivers the [`TimerTask`] it was given to
//! whatever sink the host wired up, which forwards it to
//! `RelayCtrl::on_timer`. That keeps firing order observable in tests and
//! leaves ownership of the controller with the host.

#[cfg(test)]
#[path = "timers_test.rs"]
mod timers_test;

use std::time::Duration;

/// Period of the clock refresh redraw while a game is running.
pub const CLOCK_TICK: Duration = Duration::from_secs(1);

/// How long the loading indicator stays suppressed after a sync log event.
pub const COOLDOWN: Duration = Duration::from_millis(4500);

/// Handle of a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Work delivered when a timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerTask {
    /// Periodic redraw so clocks computed from `last_move_at` advance.
    ClockTick,
    /// End of the cooldown started by the sync log event with generation `seq`.
    CooldownElapsed { seq: u64 },
}

/// Wall clock and timer source.
pub trait Scheduler {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
    /// Deliver `task` every `period` until cleared.
    fn set_interval(&self, period: Duration, task: TimerTask) -> TimerId;
    /// Deliver `task` once after `delay`.
    fn set_timeout(&self, delay: Duration, task: TimerTask) -> TimerId;
    /// Cancel a pending timer. Unknown or already fired ids are ignored.
    fn clear(&self, id: TimerId);
}

#[cfg(feature = "hydrate")]
pub use browser::BrowserScheduler;

#[cfg(feature = "hydrate")]
mod browser {
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;
    use std::time::Duration;

    use gloo_timers::callback::{Interval, Timeout};

    use super::{Scheduler, TimerId, TimerTask};

    /// `setInterval` / `setTimeout` backed scheduler.
    pub struct BrowserScheduler {
        sink: Rc<dyn Fn(TimerTask)>,
        next_id: Cell<u64>,
        intervals: RefCell<HashMap<TimerId, Interval>>,
        // Timeouts are forgotten once armed; clearing one marks it here so the
        // callback skips delivery instead of dropping itself mid-call.
        cancelled: Rc<RefCell<HashSet<TimerId>>>,
    }

    impl BrowserScheduler {
        #[must_use]
        pub fn new(sink: Rc<dyn Fn(TimerTask)>) -> Self {
            Self {
                sink,
                next_id: Cell::new(0),
                intervals: RefCell::new(HashMap::new()),
                cancelled: Rc::new(RefCell::new(HashSet::new())),
            }
        }

        fn allocate(&self) -> TimerId {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            TimerId(id)
        }
    }

    fn millis(duration: Duration) -> u32 {
        u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
    }

    impl Scheduler for BrowserScheduler {
        #[allow(clippy::cast_possible_truncation)]
        fn now_ms(&self) -> i64 {
            js_sys::Date::now() as i64
        }

        fn set_interval(&self, period: Duration, task: TimerTask) -> TimerId {
            let id = self.allocate();
            let sink = Rc::clone(&self.sink);
            let interval = Interval::new(millis(period), move || sink(task));
            self.intervals.borrow_mut().insert(id, interval);
            id
        }

        fn set_timeout(&self, delay: Duration, task: TimerTask) -> TimerId {
            let id = self.allocate();
            let sink = Rc::clone(&self.sink);
            let cancelled = Rc::clone(&self.cancelled);
            Timeout::new(millis(delay), move || {
                if cancelled.borrow_mut().remove(&id) {
                    return;
                }
                sink(task);
            })
            .forget();
            id
        }

        fn clear(&self, id: TimerId) {
            // Dropping an `Interval` cancels it.
            if self.intervals.borrow_mut().remove(&id).is_none() {
                self.cancelled.borrow_mut().insert(id);
            }
        }
    }
}
