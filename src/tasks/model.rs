use serde::{Deserialize, Serialize};

/// Lifecycle state of a background download task.
///
/// `pending → downloading → {completed | failed}`; `pending` and
/// `downloading` may also move to `cancelled`. The three terminal states are
/// immutable once reached. The set is closed: an unknown status is a
/// deserialization error, not a representable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Downloading,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Downloading => "downloading",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", label)
    }
}

/// Item counts for a task (downloaded pages vs. total).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub current: u32,
    pub total: u32,
}

/// One background download task as reported by the external worker.
///
/// Mirrored, never mutated locally; a poll response replaces whole snapshots.
/// Field names follow the worker's JSON DTO (camelCase), timestamps are epoch
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub url: String,
    pub name: String,
    pub status: TaskStatus,
    pub save_path: String,
    pub start_time: i64,
    #[serde(default)]
    pub complete_time: Option<i64>,
    pub updated_at: i64,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub progress: TaskProgress,
}

impl Task {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_three_end_states_are_terminal() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Downloading.is_terminal());
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
    }

    #[test]
    fn task_round_trips_through_the_wire_shape() {
        let json = r#"{
            "id": "t-1",
            "url": "https://example.com/gallery/42",
            "name": "Sample Gallery",
            "status": "downloading",
            "savePath": "/library/sample",
            "startTime": 1700000000000,
            "updatedAt": 1700000030000,
            "progress": { "current": 12, "total": 40 }
        }"#;
        let task: Task = serde_json::from_str(json).expect("worker DTO parses");
        assert_eq!(task.status, TaskStatus::Downloading);
        assert_eq!(task.save_path, "/library/sample");
        assert_eq!(task.complete_time, None);
        assert_eq!(task.progress.total, 40);

        let back = serde_json::to_value(&task).expect("serializes");
        assert_eq!(back["savePath"], "/library/sample", "camelCase on the wire");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<TaskStatus, _> = serde_json::from_str("\"paused\"");
        assert!(result.is_err(), "status set is closed");
    }
}
