use super::defaults;
use super::models::{LogLevel, SyncConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    tasks: TasksConfig,
    #[serde(default)]
    reader: ReaderConfig,
    #[serde(default)]
    progress: ProgressConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for SyncConfig {
    fn from(tables: ConfigTables) -> Self {
        SyncConfig {
            poll_interval_ms: tables.tasks.poll_interval_ms,
            scroll_step_distance: tables.reader.scroll_step_distance,
            scroll_step_duration_ms: tables.reader.scroll_step_duration_ms,
            frame_interval_ms: tables.reader.frame_interval_ms,
            key_scroll_forward: tables.reader.key_scroll_forward,
            key_scroll_backward: tables.reader.key_scroll_backward,
            progress_debounce_ms: tables.progress.debounce_ms,
            progress_retention_days: tables.progress.retention_days,
            progress_dir: tables.progress.dir,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&SyncConfig> for ConfigTables {
    fn from(config: &SyncConfig) -> Self {
        ConfigTables {
            tasks: TasksConfig {
                poll_interval_ms: config.poll_interval_ms,
            },
            reader: ReaderConfig {
                scroll_step_distance: config.scroll_step_distance,
                scroll_step_duration_ms: config.scroll_step_duration_ms,
                frame_interval_ms: config.frame_interval_ms,
                key_scroll_forward: config.key_scroll_forward.clone(),
                key_scroll_backward: config.key_scroll_backward.clone(),
            },
            progress: ProgressConfig {
                debounce_ms: config.progress_debounce_ms,
                retention_days: config.progress_retention_days,
                dir: config.progress_dir.clone(),
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct TasksConfig {
    #[serde(default = "defaults::default_poll_interval_ms")]
    poll_interval_ms: u64,
}

impl Default for TasksConfig {
    fn default() -> Self {
        TasksConfig {
            poll_interval_ms: defaults::default_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ReaderConfig {
    #[serde(default = "defaults::default_scroll_step_distance")]
    scroll_step_distance: f32,
    #[serde(default = "defaults::default_scroll_step_duration_ms")]
    scroll_step_duration_ms: u64,
    #[serde(default = "defaults::default_frame_interval_ms")]
    frame_interval_ms: u64,
    #[serde(default = "defaults::default_key_scroll_forward")]
    key_scroll_forward: String,
    #[serde(default = "defaults::default_key_scroll_backward")]
    key_scroll_backward: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            scroll_step_distance: defaults::default_scroll_step_distance(),
            scroll_step_duration_ms: defaults::default_scroll_step_duration_ms(),
            frame_interval_ms: defaults::default_frame_interval_ms(),
            key_scroll_forward: defaults::default_key_scroll_forward(),
            key_scroll_backward: defaults::default_key_scroll_backward(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ProgressConfig {
    #[serde(default = "defaults::default_progress_debounce_ms")]
    debounce_ms: u64,
    #[serde(default = "defaults::default_progress_retention_days")]
    retention_days: u64,
    #[serde(default = "defaults::default_progress_dir")]
    dir: String,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        ProgressConfig {
            debounce_ms: defaults::default_progress_debounce_ms(),
            retention_days: defaults::default_progress_retention_days(),
            dir: defaults::default_progress_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}
