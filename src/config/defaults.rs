pub(crate) fn default_poll_interval_ms() -> u64 {
    1000
}

pub(crate) fn default_scroll_step_distance() -> f32 {
    64.0
}

pub(crate) fn default_scroll_step_duration_ms() -> u64 {
    128
}

pub(crate) fn default_frame_interval_ms() -> u64 {
    16
}

pub(crate) fn default_key_scroll_forward() -> String {
    "j".to_string()
}

pub(crate) fn default_key_scroll_backward() -> String {
    "k".to_string()
}

pub(crate) fn default_progress_debounce_ms() -> u64 {
    1000
}

pub(crate) fn default_progress_retention_days() -> u64 {
    30
}

pub(crate) fn default_progress_dir() -> String {
    ".cache/progress".to_string()
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}
