//! Debounced persistence of per-item reading position, with expiry.
//!
//! Scrolling produces a burst of positions; only the last one inside the
//! debounce window is written. Persistence failures are logged and treated
//! as "progress unavailable" — they never interrupt navigation or
//! scrolling.

mod store;

pub use store::{FileStore, MemoryStore, ProgressStore};

use crate::clock::Clock;
use crate::config::SyncConfig;
use crate::scheduler::Scheduler;
use crate::timer::DebounceTimer;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

/// Persisted reading position for one item. Field names follow the original
/// persisted format (camelCase); `timestamp` is epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub scroll_position: f32,
    pub timestamp: i64,
    pub total_items: u32,
}

struct PendingSave {
    key: String,
    scroll_position: f32,
    total_items: u32,
}

/// Debounced writer and direct reader of [`ProgressRecord`]s.
pub struct ProgressTracker {
    store: Rc<dyn ProgressStore>,
    clock: Rc<dyn Clock>,
    debounce: DebounceTimer,
    pending: Rc<RefCell<Option<PendingSave>>>,
    retention_ms: i64,
}

impl ProgressTracker {
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        store: Rc<dyn ProgressStore>,
        clock: Rc<dyn Clock>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            store,
            clock,
            debounce: DebounceTimer::new(scheduler, config.progress_debounce()),
            pending: Rc::new(RefCell::new(None)),
            retention_ms: config.progress_retention().as_millis() as i64,
        }
    }

    /// Record the current position for `key`. The write lands after the
    /// debounce delay; calls inside the window collapse to one write
    /// carrying the last call's values.
    pub fn save(&self, key: &str, scroll_position: f32, total_items: u32) {
        *self.pending.borrow_mut() = Some(PendingSave {
            key: key.to_string(),
            scroll_position: scroll_position.max(0.0),
            total_items,
        });

        let pending = Rc::downgrade(&self.pending);
        let store = Rc::clone(&self.store);
        let clock = Rc::clone(&self.clock);
        self.debounce.reset(Box::new(move || {
            let Some(pending) = pending.upgrade() else {
                return;
            };
            let taken = pending.borrow_mut().take();
            if let Some(save) = taken {
                write_record(store.as_ref(), clock.as_ref(), save);
            }
        }));
    }

    /// Apply a pending debounced write immediately (e.g. when navigating
    /// away mid-window). No-op when nothing is pending.
    pub fn flush(&self) {
        self.debounce.cancel();
        let taken = self.pending.borrow_mut().take();
        if let Some(save) = taken {
            write_record(self.store.as_ref(), self.clock.as_ref(), save);
        }
    }

    /// Direct read, no debounce. Malformed stored data reads as absent.
    pub fn load(&self, key: &str) -> Option<ProgressRecord> {
        self.store.get(key)
    }

    /// Whether a resumable position exists for `key`.
    pub fn has_progress(&self, key: &str) -> bool {
        self.load(key)
            .map(|record| record.scroll_position > 0.0)
            .unwrap_or(false)
    }

    /// Delete the record for `key` now (the underlying item was deleted). A
    /// pending debounced write for the same key is discarded so it cannot
    /// resurrect the record.
    pub fn remove(&self, key: &str) {
        let drop_pending = self
            .pending
            .borrow()
            .as_ref()
            .is_some_and(|save| save.key == key);
        if drop_pending {
            *self.pending.borrow_mut() = None;
            self.debounce.cancel();
        }
        if let Err(err) = self.store.delete(key) {
            warn!(key, %err, "Failed to delete reading progress");
        }
    }

    /// Delete every record older than the retention window. Safe to call at
    /// any time; no-op when nothing has expired.
    pub fn sweep(&self) {
        let cutoff = self.clock.now_ms() - self.retention_ms;
        let mut removed = 0usize;
        for key in self.store.list_keys() {
            let Some(record) = self.store.get(&key) else {
                continue;
            };
            if record.timestamp < cutoff {
                match self.store.delete(&key) {
                    Ok(()) => removed += 1,
                    Err(err) => warn!(key, %err, "Failed to expire reading progress"),
                }
            }
        }
        if removed > 0 {
            debug!(removed, "Expired stale reading progress");
        }
    }
}

fn write_record(store: &dyn ProgressStore, clock: &dyn Clock, save: PendingSave) {
    let now = clock.now_ms();
    // Per-key timestamps never regress, even if the wall clock does.
    let timestamp = match store.get(&save.key) {
        Some(existing) => now.max(existing.timestamp),
        None => now,
    };
    let record = ProgressRecord {
        scroll_position: save.scroll_position,
        timestamp,
        total_items: save.total_items,
    };
    if let Err(err) = store.set(&save.key, &record) {
        warn!(key = %save.key, %err, "Failed to persist reading progress");
    } else {
        debug!(
            key = %save.key,
            scroll_position = record.scroll_position,
            "Saved reading progress"
        );
    }
}
