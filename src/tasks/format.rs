//! Display helpers for task rows.

use super::model::TaskProgress;

/// Whole percent completed; zero while the total is still unknown.
pub fn progress_percent(progress: TaskProgress) -> u32 {
    if progress.total == 0 {
        return 0;
    }
    ((progress.current as f64 / progress.total as f64) * 100.0).round() as u32
}

/// Short human-readable progress line, e.g. `12/40 pages (30%)`.
pub fn progress_summary(progress: TaskProgress) -> String {
    if progress.total == 0 {
        return "preparing download...".to_string();
    }
    format!(
        "{}/{} pages ({}%)",
        progress.current,
        progress.total,
        progress_percent(progress)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_to_nearest_whole() {
        let progress = TaskProgress {
            current: 1,
            total: 3,
        };
        assert_eq!(progress_percent(progress), 33);
        let progress = TaskProgress {
            current: 2,
            total: 3,
        };
        assert_eq!(progress_percent(progress), 67);
    }

    #[test]
    fn unknown_total_reads_as_preparing() {
        let progress = TaskProgress {
            current: 0,
            total: 0,
        };
        assert_eq!(progress_percent(progress), 0);
        assert_eq!(progress_summary(progress), "preparing download...");
    }

    #[test]
    fn summary_includes_counts_and_percent() {
        let progress = TaskProgress {
            current: 12,
            total: 40,
        };
        assert_eq!(progress_summary(progress), "12/40 pages (30%)");
    }
}
