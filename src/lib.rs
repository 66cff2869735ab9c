//! Client-side task lifecycle synchronizer and interaction scheduler for a
//! desktop manga library/downloader.
//!
//! Responsibilities here are intentionally narrow:
//! - Mirror worker-owned download task state into a local [`TaskStore`] by
//!   polling ([`TaskPoller`]), reconciled against user-triggered
//!   cancellation.
//! - Convert held-key input into continuous, bounded, frame-stepped
//!   scrolling ([`ScrollAnimator`]).
//! - Persist per-item reading positions with debounce and expiry
//!   ([`ProgressTracker`]).
//!
//! Crawling, downloading, library scanning, rendering, and IPC transport
//! live elsewhere; this crate reaches them only through the
//! [`DownloadWorker`] and [`ProgressStore`] seams. Everything runs
//! single-threaded and cooperative on the host's run loop through the
//! [`Scheduler`] abstraction, which is what makes the whole subsystem
//! testable without real timers.

pub mod clock;
pub mod config;
pub mod logging;
pub mod progress;
pub mod scheduler;
pub mod scroll;
pub mod tasks;
pub mod timer;

pub use clock::{Clock, SystemClock};
pub use config::{LogLevel, SyncConfig, load_config, parse_config, serialize_config};
pub use progress::{FileStore, MemoryStore, ProgressRecord, ProgressStore, ProgressTracker};
pub use scheduler::{FrameHandle, ManualScheduler, Scheduler, TimerHandle};
pub use scroll::{
    ScrollAction, ScrollAnimator, ScrollDirection, ScrollSurface, scroll_action_for_key,
};
pub use tasks::{
    DownloadWorker, HistoryTicket, PollTicket, Task, TaskNotifier, TaskPoller, TaskProgress,
    TaskStatus, TaskStore, ViewTab, WorkerError,
};
pub use timer::DebounceTimer;
