//! Task lifecycle synchronization.
//!
//! The external worker owns every download task; this module mirrors its
//! state into a local [`TaskStore`] by polling, detects completions, and
//! forwards cancel/clear requests. Mirroring is eventually consistent,
//! bounded by the poll interval.

mod format;
mod model;
mod poller;
mod store;
mod worker;

pub use format::{progress_percent, progress_summary};
pub use model::{Task, TaskProgress, TaskStatus};
pub use poller::{HistoryTicket, PollTicket, TaskPoller};
pub use store::TaskStore;
pub use worker::{DownloadWorker, WorkerError};

/// Sink for user-facing "N tasks completed" notifications raised by the
/// poller's completion heuristic.
pub trait TaskNotifier {
    fn tasks_completed(&self, count: usize);
}

/// Which tab of the downloads view the consumer is showing. History is only
/// refreshed while it is actually visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewTab {
    #[default]
    Downloading,
    History,
}
