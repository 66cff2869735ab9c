//! Cooperative timer and frame scheduling.
//!
//! The poller, the scroll animator, and the progress debounce never touch
//! real timers directly; they go through the [`Scheduler`] trait so tests can
//! drive time deterministically. Production hosts implement the trait over
//! whatever run loop they already own; [`ManualScheduler`] is the
//! deterministic implementation used by every test in this crate and by
//! embedders that pump ticks themselves.
//!
//! Execution is single-threaded and cooperative: a callback always runs to
//! completion before the next one fires, and cancelling an already-fired
//! handle is a no-op.

use std::cell::RefCell;
use std::time::Duration;

/// Identifies a scheduled repeating or one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Identifies a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

pub trait Scheduler {
    /// Schedule `callback` to run every `interval` until cancelled. The first
    /// firing happens one full interval after scheduling.
    fn repeat(&self, interval: Duration, callback: Box<dyn FnMut()>) -> TimerHandle;

    /// Schedule `callback` to run once after `delay`.
    fn once(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle;

    /// Cancel a timer. Unknown or already-fired handles are ignored.
    fn cancel(&self, handle: TimerHandle);

    /// Schedule `callback` for the next frame batch.
    fn next_frame(&self, callback: Box<dyn FnOnce()>) -> FrameHandle;

    /// Cancel a pending frame callback. Unknown handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);
}

enum TimerKind {
    Repeating {
        period: Duration,
        // Taken out while the callback runs so a reentrant `cancel` can
        // remove the entry itself.
        callback: Option<Box<dyn FnMut()>>,
    },
    OneShot {
        callback: Option<Box<dyn FnOnce()>>,
    },
}

struct TimerEntry {
    handle: TimerHandle,
    due: Duration,
    kind: TimerKind,
}

struct FrameEntry {
    handle: FrameHandle,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualInner {
    now: Duration,
    next_id: u64,
    timers: Vec<TimerEntry>,
    frames: Vec<FrameEntry>,
}

/// Deterministic [`Scheduler`] driven by explicit [`advance`](Self::advance)
/// and [`run_frames`](Self::run_frames) calls against a virtual clock.
#[derive(Default)]
pub struct ManualScheduler {
    inner: RefCell<ManualInner>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position of the virtual clock.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    fn alloc_id(inner: &mut ManualInner) -> u64 {
        inner.next_id += 1;
        inner.next_id
    }

    /// Move the virtual clock forward by `delta`, firing every timer that
    /// falls due, in due order. Timers scheduled by a firing callback
    /// participate if they fall inside the window.
    pub fn advance(&self, delta: Duration) {
        let target = self.inner.borrow().now + delta;
        loop {
            let next = {
                let inner = self.inner.borrow();
                inner
                    .timers
                    .iter()
                    .filter(|t| t.due <= target)
                    .min_by_key(|t| (t.due, t.handle.0))
                    .map(|t| t.handle)
            };
            let Some(handle) = next else {
                break;
            };
            self.fire_timer(handle);
        }
        self.inner.borrow_mut().now = target;
    }

    fn fire_timer(&self, handle: TimerHandle) {
        enum Taken {
            Repeating(Box<dyn FnMut()>),
            OneShot(Box<dyn FnOnce()>),
        }

        let taken = {
            let mut inner = self.inner.borrow_mut();
            let Some(idx) = inner.timers.iter().position(|t| t.handle == handle) else {
                return;
            };
            inner.now = inner.timers[idx].due;
            if matches!(inner.timers[idx].kind, TimerKind::OneShot { .. }) {
                // Fired one-shots are gone before the callback runs, so a
                // cancel from inside the callback is a no-op.
                let entry = inner.timers.remove(idx);
                match entry.kind {
                    TimerKind::OneShot { callback } => callback.map(Taken::OneShot),
                    TimerKind::Repeating { .. } => None,
                }
            } else {
                match &mut inner.timers[idx].kind {
                    TimerKind::Repeating { callback, .. } => {
                        callback.take().map(Taken::Repeating)
                    }
                    TimerKind::OneShot { .. } => None,
                }
            }
        };

        match taken {
            Some(Taken::Repeating(mut callback)) => {
                callback();
                let mut inner = self.inner.borrow_mut();
                // The callback may have cancelled its own timer; only restore
                // the entry if it is still registered.
                if let Some(entry) = inner.timers.iter_mut().find(|t| t.handle == handle) {
                    if let TimerKind::Repeating {
                        period,
                        callback: slot,
                    } = &mut entry.kind
                    {
                        let period = *period;
                        *slot = Some(callback);
                        entry.due += period;
                    }
                }
            }
            Some(Taken::OneShot(callback)) => callback(),
            None => {}
        }
    }

    /// Run one frame batch: every callback queued before this call fires,
    /// callbacks queued *during* the batch wait for the next one (matching
    /// `requestAnimationFrame` semantics). Returns the number of callbacks
    /// run.
    pub fn run_frames(&self) -> usize {
        let batch: Vec<FrameHandle> = self
            .inner
            .borrow()
            .frames
            .iter()
            .map(|f| f.handle)
            .collect();
        let mut ran = 0;
        for handle in batch {
            let callback = {
                let mut inner = self.inner.borrow_mut();
                inner
                    .frames
                    .iter()
                    .position(|f| f.handle == handle)
                    .map(|idx| inner.frames.remove(idx).callback)
            };
            if let Some(callback) = callback {
                callback();
                ran += 1;
            }
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn repeat(&self, interval: Duration, callback: Box<dyn FnMut()>) -> TimerHandle {
        debug_assert!(!interval.is_zero(), "repeat interval must be non-zero");
        let mut inner = self.inner.borrow_mut();
        let handle = TimerHandle(Self::alloc_id(&mut inner));
        let due = inner.now + interval;
        inner.timers.push(TimerEntry {
            handle,
            due,
            kind: TimerKind::Repeating {
                period: interval,
                callback: Some(callback),
            },
        });
        handle
    }

    fn once(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        let handle = TimerHandle(Self::alloc_id(&mut inner));
        let due = inner.now + delay;
        inner.timers.push(TimerEntry {
            handle,
            due,
            kind: TimerKind::OneShot {
                callback: Some(callback),
            },
        });
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut inner = self.inner.borrow_mut();
        inner.timers.retain(|t| t.handle != handle);
    }

    fn next_frame(&self, callback: Box<dyn FnOnce()>) -> FrameHandle {
        let mut inner = self.inner.borrow_mut();
        let handle = FrameHandle(Self::alloc_id(&mut inner));
        inner.frames.push(FrameEntry { handle, callback });
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let mut inner = self.inner.borrow_mut();
        inner.frames.retain(|f| f.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn repeat_fires_once_per_elapsed_interval() {
        let scheduler = ManualScheduler::new();
        let count = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&count);
        scheduler.repeat(
            Duration::from_millis(100),
            Box::new(move || seen.set(seen.get() + 1)),
        );

        scheduler.advance(Duration::from_millis(50));
        assert_eq!(count.get(), 0, "first interval has not elapsed yet");

        scheduler.advance(Duration::from_millis(50));
        assert_eq!(count.get(), 1);

        scheduler.advance(Duration::from_millis(350));
        assert_eq!(count.get(), 4, "three more intervals fit in 350ms");
    }

    #[test]
    fn cancel_is_idempotent_and_stops_firing() {
        let scheduler = ManualScheduler::new();
        let count = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&count);
        let handle = scheduler.repeat(
            Duration::from_millis(10),
            Box::new(move || seen.set(seen.get() + 1)),
        );

        scheduler.advance(Duration::from_millis(10));
        scheduler.cancel(handle);
        scheduler.cancel(handle);
        scheduler.advance(Duration::from_millis(100));
        assert_eq!(count.get(), 1, "no firings after cancel");
    }

    #[test]
    fn once_fires_exactly_once() {
        let scheduler = ManualScheduler::new();
        let count = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&count);
        scheduler.once(
            Duration::from_millis(30),
            Box::new(move || seen.set(seen.get() + 1)),
        );

        scheduler.advance(Duration::from_millis(200));
        assert_eq!(count.get(), 1);
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn callback_can_cancel_its_own_repeat() {
        let scheduler = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0u32));
        let handle_slot: Rc<Cell<Option<TimerHandle>>> = Rc::new(Cell::new(None));

        let seen = Rc::clone(&count);
        let sched = Rc::clone(&scheduler);
        let slot = Rc::clone(&handle_slot);
        let handle = scheduler.repeat(
            Duration::from_millis(10),
            Box::new(move || {
                seen.set(seen.get() + 1);
                if let Some(handle) = slot.get() {
                    sched.cancel(handle);
                }
            }),
        );
        handle_slot.set(Some(handle));

        scheduler.advance(Duration::from_millis(100));
        assert_eq!(count.get(), 1, "timer removed itself on first firing");
    }

    #[test]
    fn timers_fire_in_due_order() {
        let scheduler = ManualScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let seen = Rc::clone(&order);
        scheduler.once(
            Duration::from_millis(20),
            Box::new(move || seen.borrow_mut().push("late")),
        );
        let seen = Rc::clone(&order);
        scheduler.once(
            Duration::from_millis(10),
            Box::new(move || seen.borrow_mut().push("early")),
        );

        scheduler.advance(Duration::from_millis(50));
        assert_eq!(*order.borrow(), vec!["early", "late"]);
    }

    #[test]
    fn frames_scheduled_during_a_batch_wait_for_the_next() {
        let scheduler = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0u32));

        let seen = Rc::clone(&count);
        let sched = Rc::clone(&scheduler);
        scheduler.next_frame(Box::new(move || {
            seen.set(seen.get() + 1);
            let seen = Rc::clone(&seen);
            sched.next_frame(Box::new(move || seen.set(seen.get() + 1)));
        }));

        assert_eq!(scheduler.run_frames(), 1, "rescheduled frame is deferred");
        assert_eq!(count.get(), 1);
        assert_eq!(scheduler.run_frames(), 1);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn cancelled_frame_does_not_run() {
        let scheduler = ManualScheduler::new();
        let count = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&count);
        let handle = scheduler.next_frame(Box::new(move || seen.set(seen.get() + 1)));
        scheduler.cancel_frame(handle);
        assert_eq!(scheduler.run_frames(), 0);
        assert_eq!(count.get(), 0);
    }
}
