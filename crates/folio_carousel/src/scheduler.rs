// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cooperative, single-threaded timer queue.
//!
//! The scheduler owns no thread and reads no clock. The host advances it
//! (with real elapsed time from the frame loop, or simulated time in tests)
//! and due callbacks run one at a time, in `(deadline, timer id)` order.
//!
//! A timer lives exactly as long as its [`TimerHandle`]. Dropping the handle
//! cancels the timer, and a cancelled timer never fires again, even later in
//! the same `advance` call.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Shortest period a repeating timer may have
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Identifier of a registered timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

type TickCallback = Rc<RefCell<dyn FnMut(Duration)>>;

struct TimerEntry {
    period: Duration,
    next_due: Duration,
    callback: TickCallback,
}

#[derive(Default)]
struct SchedulerInner {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<TimerId, TimerEntry>,
}

/// Timer queue driven by an external clock
///
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Scheduler {
    /// Create an empty scheduler at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scheduler time
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of live timers
    pub fn active_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Earliest pending deadline, if any timer is live
    pub fn next_deadline(&self) -> Option<Duration> {
        self.inner
            .borrow()
            .timers
            .values()
            .map(|entry| entry.next_due)
            .min()
    }

    /// Register a repeating timer whose first tick is one `period` from now.
    ///
    /// The callback receives the tick's deadline.
    pub fn every<F>(&self, period: Duration, callback: F) -> TimerHandle
    where
        F: FnMut(Duration) + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        let next_due = inner.now + period;
        inner.timers.insert(
            id,
            TimerEntry {
                period,
                next_due,
                callback: Rc::new(RefCell::new(callback)),
            },
        );

        TimerHandle {
            id,
            scheduler: Rc::downgrade(&self.inner),
        }
    }

    /// Advance the clock by `delta`, firing every tick that falls due.
    ///
    /// Returns the number of callbacks run.
    pub fn advance(&self, delta: Duration) -> usize {
        let target = self.now() + delta;
        self.advance_to(target)
    }

    /// Advance the clock to `target` (never backwards), firing due ticks in order.
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;

        loop {
            let due = {
                let mut inner = self.inner.borrow_mut();
                let next = inner
                    .timers
                    .iter()
                    .filter(|(_, entry)| entry.next_due <= target)
                    .map(|(id, entry)| (entry.next_due, *id))
                    .min();
                let Some((deadline, id)) = next else {
                    break;
                };

                inner.now = inner.now.max(deadline);
                inner.timers.get_mut(&id).map(|entry| {
                    entry.next_due += entry.period;
                    (Rc::clone(&entry.callback), deadline)
                })
            };

            // The queue borrow is released here so callbacks may register or cancel timers.
            if let Some((callback, deadline)) = due {
                let mut tick = callback.borrow_mut();
                (*tick)(deadline);
                fired += 1;
            }
        }

        let mut inner = self.inner.borrow_mut();
        inner.now = inner.now.max(target);
        fired
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("now", &inner.now)
            .field("active_timers", &inner.timers.len())
            .finish()
    }
}

/// Ownership of one registered timer; dropping it cancels the timer
#[derive(Debug)]
pub struct TimerHandle {
    id: TimerId,
    scheduler: Weak<RefCell<SchedulerInner>>,
}

impl TimerHandle {
    /// Timer identifier
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Whether the timer is still registered
    pub fn is_active(&self) -> bool {
        self.scheduler
            .upgrade()
            .is_some_and(|inner| inner.borrow().timers.contains_key(&self.id))
    }

    /// Cancel the timer now
    pub fn cancel(self) {}
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(inner) = self.scheduler.upgrade() {
            let removed = inner.borrow_mut().timers.remove(&self.id);
            // Callback captures are dropped after the queue borrow ends.
            drop(removed);
        }
    }
}
