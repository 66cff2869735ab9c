use super::model::Task;

/// Local mirror of worker-owned task state, partitioned into active and
/// history snapshots.
///
/// Snapshot-replace semantics: a refresh swaps a whole collection, it never
/// patches rows in place. The poller is the only writer on the refresh path;
/// the user-initiated clear flow is the only other writer. A failed refresh
/// never reaches a setter, so the last-known-good snapshot survives worker
/// outages.
#[derive(Debug, Default)]
pub struct TaskStore {
    active: Vec<Task>,
    history: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&mut self, tasks: Vec<Task>) {
        self.active = tasks;
    }

    pub fn set_history(&mut self, tasks: Vec<Task>) {
        self.history = tasks;
    }

    pub fn active(&self) -> &[Task] {
        &self.active
    }

    pub fn history(&self) -> &[Task] {
        &self.history
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Optimistic local clear after the worker acknowledged a history wipe.
    pub fn clear_history_local(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::model::{TaskProgress, TaskStatus};

    fn task(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            url: format!("https://example.com/{id}"),
            name: id.to_string(),
            status,
            save_path: format!("/library/{id}"),
            start_time: 1_700_000_000_000,
            complete_time: status.is_terminal().then_some(1_700_000_060_000),
            updated_at: 1_700_000_060_000,
            error: None,
            progress: TaskProgress::default(),
        }
    }

    #[test]
    fn snapshots_replace_wholesale() {
        let mut store = TaskStore::new();
        store.set_active(vec![
            task("a", TaskStatus::Pending),
            task("b", TaskStatus::Downloading),
        ]);
        assert_eq!(store.active_count(), 2);

        store.set_active(vec![task("b", TaskStatus::Downloading)]);
        assert_eq!(store.active_count(), 1);
        assert_eq!(store.active()[0].id, "b", "old snapshot fully replaced");
    }

    #[test]
    fn clearing_history_leaves_active_untouched() {
        let mut store = TaskStore::new();
        store.set_active(vec![task("a", TaskStatus::Downloading)]);
        store.set_history(vec![task("b", TaskStatus::Completed)]);

        store.clear_history_local();
        assert!(store.history().is_empty());
        assert_eq!(store.active_count(), 1);
    }
}
