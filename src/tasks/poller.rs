use super::model::Task;
use super::store::TaskStore;
use super::worker::{DownloadWorker, WorkerError};
use super::{TaskNotifier, ViewTab};
use crate::config::SyncConfig;
use crate::scheduler::{Scheduler, TimerHandle};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

/// Proof that an active-snapshot fetch was issued; pairs a response with the
/// request generation it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket {
    seq: u64,
}

/// History analogue of [`PollTicket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryTicket {
    seq: u64,
}

struct PollerState {
    running: bool,
    poll_handle: Option<TimerHandle>,
    previous_active_count: usize,
    view: ViewTab,
    active_seq: u64,
    history_seq: u64,
}

impl PollerState {
    fn new() -> Self {
        Self {
            running: false,
            poll_handle: None,
            previous_active_count: 0,
            view: ViewTab::default(),
            active_seq: 0,
            history_seq: 0,
        }
    }
}

/// Drives periodic refresh of a [`TaskStore`] from the external worker.
///
/// One poll cycle fetches the active snapshot (and, while the consumer is
/// viewing History, the history snapshot) and replaces the store's
/// collections wholesale. Completions are detected by the active-count
/// delta: when the count shrinks by N, one "N tasks completed" notification
/// is raised. The heuristic cannot tell a finished task from one that
/// vanished for another reason, and misses a completion that coincides with
/// a new task starting in the same cycle; it is kept as the cheap
/// approximation the product shipped with.
///
/// Every response application is guarded by a per-stream sequence number so
/// a slow round trip resolving after a newer one has applied is discarded,
/// and by the `running` flag so nothing mutates state after [`stop`].
///
/// [`stop`]: TaskPoller::stop
pub struct TaskPoller {
    state: Rc<RefCell<PollerState>>,
    scheduler: Rc<dyn Scheduler>,
    worker: Rc<dyn DownloadWorker>,
    store: Rc<RefCell<TaskStore>>,
    notifier: Rc<dyn TaskNotifier>,
    interval: Duration,
}

impl TaskPoller {
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        worker: Rc<dyn DownloadWorker>,
        store: Rc<RefCell<TaskStore>>,
        notifier: Rc<dyn TaskNotifier>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(PollerState::new())),
            scheduler,
            worker,
            store,
            notifier,
            interval: config.poll_interval(),
        }
    }

    /// Begin mirroring: one immediate poll, then one per interval. Calling
    /// `start` on a running poller is a no-op, so timers never accumulate.
    pub fn start(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.running {
                debug!("Poller already running; start ignored");
                return;
            }
            state.running = true;
        }
        self.poll();

        let state = Rc::downgrade(&self.state);
        let worker = Rc::clone(&self.worker);
        let store = Rc::clone(&self.store);
        let notifier = Rc::clone(&self.notifier);
        let handle = self.scheduler.repeat(
            self.interval,
            Box::new(move || {
                let Some(state) = state.upgrade() else {
                    return;
                };
                poll_cycle(&state, worker.as_ref(), &store, notifier.as_ref());
            }),
        );
        self.state.borrow_mut().poll_handle = Some(handle);
    }

    /// Stop mirroring. Idempotent; an in-flight response issued before the
    /// stop is dropped at apply time.
    pub fn stop(&self) {
        let handle = {
            let mut state = self.state.borrow_mut();
            state.running = false;
            state.poll_handle.take()
        };
        if let Some(handle) = handle {
            self.scheduler.cancel(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    pub fn view(&self) -> ViewTab {
        self.state.borrow().view
    }

    /// Record which tab the consumer is showing. Switching to History
    /// refreshes it immediately rather than waiting for the next tick.
    pub fn set_view(&self, view: ViewTab) {
        let refresh_history = {
            let mut state = self.state.borrow_mut();
            let switched = state.view != view && view == ViewTab::History;
            state.view = view;
            switched && state.running
        };
        if refresh_history {
            let ticket = self.begin_history_fetch();
            let result = self.worker.history_tasks();
            self.complete_history_fetch(ticket, result);
        }
    }

    /// Run one full poll cycle now. No-op while stopped.
    pub fn poll(&self) {
        poll_cycle(
            &self.state,
            self.worker.as_ref(),
            &self.store,
            self.notifier.as_ref(),
        );
    }

    /// Issue half of the active-snapshot fetch: bumps the request generation
    /// and returns the ticket the response must present. Hosts with an
    /// asynchronous worker transport call this before their round trip.
    pub fn begin_poll(&self) -> PollTicket {
        let mut state = self.state.borrow_mut();
        state.active_seq = state.active_seq.wrapping_add(1);
        PollTicket {
            seq: state.active_seq,
        }
    }

    /// Apply half of the active-snapshot fetch. A response whose ticket is
    /// not the most recently issued one, or that arrives after [`stop`],
    /// is discarded; a failed fetch keeps the previous snapshot.
    ///
    /// [`stop`]: TaskPoller::stop
    pub fn complete_poll(&self, ticket: PollTicket, result: Result<Vec<Task>, WorkerError>) {
        complete_active(
            &self.state,
            &self.store,
            self.notifier.as_ref(),
            ticket,
            result,
        );
    }

    /// See [`begin_poll`](TaskPoller::begin_poll); same split for history.
    pub fn begin_history_fetch(&self) -> HistoryTicket {
        let mut state = self.state.borrow_mut();
        state.history_seq = state.history_seq.wrapping_add(1);
        HistoryTicket {
            seq: state.history_seq,
        }
    }

    pub fn complete_history_fetch(
        &self,
        ticket: HistoryTicket,
        result: Result<Vec<Task>, WorkerError>,
    ) {
        complete_history(&self.state, &self.store, ticket, result);
    }

    /// Ask the worker to cancel one task. Success triggers a fresh poll so
    /// the UI reflects the cancellation without waiting for the next tick;
    /// failure is propagated untouched and does not force a re-poll.
    /// Best-effort, at-most-once: no automatic retry.
    pub fn cancel(&self, task_id: &str) -> Result<(), WorkerError> {
        self.worker.cancel_task(task_id)?;
        debug!(task_id, "Cancellation accepted; refreshing snapshot");
        self.poll();
        Ok(())
    }

    /// Ask the worker to wipe history, then clear the local mirror
    /// optimistically. Failure is propagated and leaves history untouched.
    pub fn clear_history(&self) -> Result<(), WorkerError> {
        self.worker.clear_history()?;
        {
            let mut state = self.state.borrow_mut();
            // Invalidate any in-flight history fetch so a slow response
            // cannot resurrect cleared rows.
            state.history_seq = state.history_seq.wrapping_add(1);
        }
        self.store.borrow_mut().clear_history_local();
        Ok(())
    }
}

fn poll_cycle(
    state: &Rc<RefCell<PollerState>>,
    worker: &dyn DownloadWorker,
    store: &Rc<RefCell<TaskStore>>,
    notifier: &dyn TaskNotifier,
) {
    if !state.borrow().running {
        debug!("Poll requested while stopped; skipping");
        return;
    }

    let ticket = {
        let mut s = state.borrow_mut();
        s.active_seq = s.active_seq.wrapping_add(1);
        PollTicket { seq: s.active_seq }
    };
    let result = worker.active_tasks();
    complete_active(state, store, notifier, ticket, result);

    if state.borrow().view == ViewTab::History {
        let ticket = {
            let mut s = state.borrow_mut();
            s.history_seq = s.history_seq.wrapping_add(1);
            HistoryTicket { seq: s.history_seq }
        };
        let result = worker.history_tasks();
        complete_history(state, store, ticket, result);
    }
}

fn complete_active(
    state: &Rc<RefCell<PollerState>>,
    store: &Rc<RefCell<TaskStore>>,
    notifier: &dyn TaskNotifier,
    ticket: PollTicket,
    result: Result<Vec<Task>, WorkerError>,
) {
    let completed = {
        let mut s = state.borrow_mut();
        if !s.running {
            debug!("Dropping active snapshot received after stop");
            return;
        }
        if ticket.seq != s.active_seq {
            debug!(
                seq = ticket.seq,
                current = s.active_seq,
                "Ignoring stale active snapshot"
            );
            return;
        }
        match result {
            Ok(tasks) => {
                let current = tasks.len();
                store.borrow_mut().set_active(tasks);
                let previous = s.previous_active_count;
                s.previous_active_count = current;
                previous.saturating_sub(current)
            }
            Err(err) => {
                warn!(%err, "Failed to refresh active tasks; keeping last snapshot");
                0
            }
        }
    };
    // Notify outside the state borrow; the sink is host code.
    if completed > 0 {
        notifier.tasks_completed(completed);
    }
}

fn complete_history(
    state: &Rc<RefCell<PollerState>>,
    store: &Rc<RefCell<TaskStore>>,
    ticket: HistoryTicket,
    result: Result<Vec<Task>, WorkerError>,
) {
    let s = state.borrow();
    if !s.running {
        debug!("Dropping history snapshot received after stop");
        return;
    }
    if ticket.seq != s.history_seq {
        debug!(
            seq = ticket.seq,
            current = s.history_seq,
            "Ignoring stale history snapshot"
        );
        return;
    }
    drop(s);
    match result {
        Ok(tasks) => store.borrow_mut().set_history(tasks),
        Err(err) => {
            warn!(%err, "Failed to refresh history tasks; keeping last snapshot");
        }
    }
}
