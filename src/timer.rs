//! Explicit debounce timer.
//!
//! The original persistence path debounced through a captured `setTimeout`
//! closure; here the pending timer is an owned object with `reset`/`cancel`
//! so callers (and tests, through [`ManualScheduler`](crate::scheduler::ManualScheduler))
//! can observe and flush it deterministically.

use crate::scheduler::{Scheduler, TimerHandle};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

pub struct DebounceTimer {
    scheduler: Rc<dyn Scheduler>,
    delay: Duration,
    armed: Rc<Cell<Option<TimerHandle>>>,
}

impl DebounceTimer {
    pub fn new(scheduler: Rc<dyn Scheduler>, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            armed: Rc::new(Cell::new(None)),
        }
    }

    /// Drop any pending firing and arm the timer afresh with `action`.
    pub fn reset(&self, action: Box<dyn FnOnce()>) {
        self.cancel();
        let armed = Rc::clone(&self.armed);
        let handle = self.scheduler.once(
            self.delay,
            Box::new(move || {
                armed.set(None);
                action();
            }),
        );
        self.armed.set(Some(handle));
    }

    /// Disarm without firing. No-op when nothing is pending.
    pub fn cancel(&self) {
        if let Some(handle) = self.armed.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.armed.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;

    #[test]
    fn reset_within_window_collapses_to_one_firing() {
        let scheduler = Rc::new(ManualScheduler::new());
        let timer = DebounceTimer::new(
            Rc::clone(&scheduler) as Rc<dyn Scheduler>,
            Duration::from_millis(100),
        );
        let fired = Rc::new(Cell::new(0u32));

        for _ in 0..3 {
            let seen = Rc::clone(&fired);
            timer.reset(Box::new(move || seen.set(seen.get() + 1)));
            scheduler.advance(Duration::from_millis(50));
        }
        assert_eq!(fired.get(), 0, "every reset pushed the deadline out");
        assert!(timer.is_pending());

        scheduler.advance(Duration::from_millis(100));
        assert_eq!(fired.get(), 1);
        assert!(!timer.is_pending(), "firing disarms the timer");
    }

    #[test]
    fn cancel_prevents_firing() {
        let scheduler = Rc::new(ManualScheduler::new());
        let timer = DebounceTimer::new(
            Rc::clone(&scheduler) as Rc<dyn Scheduler>,
            Duration::from_millis(100),
        );
        let fired = Rc::new(Cell::new(0u32));

        let seen = Rc::clone(&fired);
        timer.reset(Box::new(move || seen.set(seen.get() + 1)));
        timer.cancel();
        timer.cancel();
        scheduler.advance(Duration::from_millis(500));
        assert_eq!(fired.get(), 0);
    }
}
