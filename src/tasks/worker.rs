use super::model::{Task, TaskStatus};
use thiserror::Error;

/// Failures surfaced by the worker RPC boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    #[error("no task with id {0}")]
    NotFound(String),
    #[error("task {id} is already {status}")]
    InvalidState { id: String, status: TaskStatus },
    #[error("worker transport failed: {0}")]
    Transport(String),
}

/// RPC surface of the external download worker.
///
/// The worker owns task lifecycles outright; this side only mirrors them.
/// Calls are synchronous from the subsystem's point of view — hosts whose
/// transport is asynchronous bridge through
/// [`TaskPoller::begin_poll`](super::TaskPoller::begin_poll) /
/// [`TaskPoller::complete_poll`](super::TaskPoller::complete_poll) instead of
/// blocking in these methods.
pub trait DownloadWorker {
    /// Snapshot of every task that has not reached a terminal status.
    fn active_tasks(&self) -> Result<Vec<Task>, WorkerError>;

    /// Snapshot of terminal tasks, most recent first.
    fn history_tasks(&self) -> Result<Vec<Task>, WorkerError>;

    /// Request cancellation of one task. Fails with [`WorkerError::NotFound`]
    /// for unknown ids and [`WorkerError::InvalidState`] for tasks already in
    /// a terminal status.
    fn cancel_task(&self, id: &str) -> Result<(), WorkerError>;

    /// Wipe the worker-side history.
    fn clear_history(&self) -> Result<(), WorkerError>;
}
