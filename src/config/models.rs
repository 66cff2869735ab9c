use serde::Deserialize;
use std::time::Duration;

/// High-level subsystem configuration; deserializable from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
pub struct SyncConfig {
    #[serde(default = "crate::config::defaults::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_scroll_step_distance")]
    pub scroll_step_distance: f32,
    #[serde(default = "crate::config::defaults::default_scroll_step_duration_ms")]
    pub scroll_step_duration_ms: u64,
    #[serde(default = "crate::config::defaults::default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_key_scroll_forward")]
    pub key_scroll_forward: String,
    #[serde(default = "crate::config::defaults::default_key_scroll_backward")]
    pub key_scroll_backward: String,
    #[serde(default = "crate::config::defaults::default_progress_debounce_ms")]
    pub progress_debounce_ms: u64,
    #[serde(default = "crate::config::defaults::default_progress_retention_days")]
    pub progress_retention_days: u64,
    #[serde(default = "crate::config::defaults::default_progress_dir")]
    pub progress_dir: String,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            poll_interval_ms: crate::config::defaults::default_poll_interval_ms(),
            scroll_step_distance: crate::config::defaults::default_scroll_step_distance(),
            scroll_step_duration_ms: crate::config::defaults::default_scroll_step_duration_ms(),
            frame_interval_ms: crate::config::defaults::default_frame_interval_ms(),
            key_scroll_forward: crate::config::defaults::default_key_scroll_forward(),
            key_scroll_backward: crate::config::defaults::default_key_scroll_backward(),
            progress_debounce_ms: crate::config::defaults::default_progress_debounce_ms(),
            progress_retention_days: crate::config::defaults::default_progress_retention_days(),
            progress_dir: crate::config::defaults::default_progress_dir(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

impl SyncConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn progress_debounce(&self) -> Duration {
        Duration::from_millis(self.progress_debounce_ms)
    }

    pub fn progress_retention(&self) -> Duration {
        Duration::from_secs(self.progress_retention_days * 24 * 60 * 60)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Frames one scroll step is spread across; never below one.
    pub fn frames_per_step(&self) -> f32 {
        let frame = self.frame_interval_ms.max(1);
        (self.scroll_step_duration_ms as f32 / frame as f32).max(1.0)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Debug
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
