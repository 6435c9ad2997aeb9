//! Housekeeping for the output tree
//!
//! Keeps `result/index.html` and `result/timeline.html` pointing at the newest
//! rendered pages and prunes dated files past the retention window. Nothing
//! here fails a run: I/O problems are logged and the task moves on.

use crate::config::OutputConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Which tasks to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceTasks {
    pub update_index: bool,
    pub clean_old_files: bool,
    /// Retention window for cleanup
    pub days: u64,
}

impl MaintenanceTasks {
    pub fn all(days: u64) -> Self {
        Self {
            update_index: true,
            clean_old_files: true,
            days,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub index: Option<PathBuf>,
    pub timeline_index: Option<PathBuf>,
    pub removed_files: usize,
}

/// Copy the newest bot page in `result/history` to `result/index.html`
pub fn update_index(output: &OutputConfig) -> Option<PathBuf> {
    publish_newest(&output.history_dir(), &output.result_dir().join("index.html"))
}

/// Copy the newest page in `result/timeline` to `result/timeline.html`
pub fn update_timeline_index(output: &OutputConfig) -> Option<PathBuf> {
    publish_newest(&output.timeline_dir(), &output.result_dir().join("timeline.html"))
}

fn publish_newest(dir: &Path, target: &Path) -> Option<PathBuf> {
    let Some(newest) = newest_html(dir) else {
        warn!("No HTML files found in {}", dir.display());
        return None;
    };

    match fs::copy(&newest, target) {
        Ok(_) => {
            info!("Updated {} with content from {}", target.display(), newest.display());
            Some(target.to_path_buf())
        }
        Err(e) => {
            error!("Error updating {}: {}", target.display(), e);
            None
        }
    }
}

/// Most recently modified `*.html` file directly under `dir`
fn newest_html(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "html") && path.is_file())
        .filter_map(|path| {
            let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
            Some((modified, path))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

/// Delete regular files in `dir` last modified more than `days` days ago.
///
/// Subdirectories are left alone. Returns how many files were removed.
pub fn clean_old_files(dir: &Path, days: u64) -> usize {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read {}: {}", dir.display(), e);
            return 0;
        }
    };

    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(days.saturating_mul(SECS_PER_DAY)))
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut removed = 0;
    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        let metadata = match entry.metadata() {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) => {
                error!("Error processing file {}: {}", path.display(), e);
                continue;
            }
        };

        let outcome = metadata.modified().and_then(|modified| {
            if modified < cutoff {
                fs::remove_file(&path).map(|_| true)
            } else {
                Ok(false)
            }
        });

        match outcome {
            Ok(true) => {
                info!("Deleted old file: {}", path.display());
                removed += 1;
            }
            Ok(false) => {}
            Err(e) => error!("Error processing file {}: {}", path.display(), e),
        }
    }

    removed
}

/// Run the selected tasks against the output tree
pub fn run(tasks: &MaintenanceTasks, output: &OutputConfig) -> MaintenanceReport {
    let mut report = MaintenanceReport::default();

    if tasks.update_index {
        info!("Updating index pages...");
        report.index = update_index(output);
        report.timeline_index = update_timeline_index(output);
    }

    if tasks.clean_old_files {
        info!("Cleaning old files (older than {} days)...", tasks.days);
        let dirs = [
            output.history_dir(),
            output.timeline_dir(),
            output.json_dir(),
            output.bots_dir(),
            output.logs(),
        ];
        report.removed_files = dirs
            .iter()
            .filter(|dir| dir.is_dir())
            .map(|dir| clean_old_files(dir, tasks.days))
            .sum();
        info!("Cleanup complete, {} files removed", report.removed_files);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_in(dir: &Path) -> OutputConfig {
        OutputConfig {
            base_dir: dir.join("output").to_string_lossy().into_owned(),
            logs_dir: dir.join("logs").to_string_lossy().into_owned(),
        }
    }

    fn write_aged(path: &Path, content: &str, age_days: u64) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_days * SECS_PER_DAY + 60))
            .unwrap();
    }

    #[test]
    fn test_update_index_picks_newest() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(dir.path());
        let history = output.history_dir();
        write_aged(&history.join("bots_2025-03-01.html"), "old", 3);
        write_aged(&history.join("bots_2025-03-03.html"), "new", 1);
        write_aged(&history.join("notes.txt"), "ignored", 0);

        let index = update_index(&output).unwrap();
        assert_eq!(fs::read_to_string(index).unwrap(), "new");
    }

    #[test]
    fn test_update_index_without_pages() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(dir.path());
        assert!(update_index(&output).is_none());
        fs::create_dir_all(output.timeline_dir()).unwrap();
        assert!(update_timeline_index(&output).is_none());
    }

    #[test]
    fn test_update_timeline_index() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(dir.path());
        write_aged(&output.timeline_dir().join("timeline_2025-03-02.html"), "tl", 0);

        let published = update_timeline_index(&output).unwrap();
        assert!(published.ends_with("result/timeline.html"));
        assert_eq!(fs::read_to_string(published).unwrap(), "tl");
    }

    #[test]
    fn test_clean_old_files() {
        let dir = tempfile::tempdir().unwrap();
        write_aged(&dir.path().join("stale.json"), "{}", 10);
        write_aged(&dir.path().join("fresh.json"), "{}", 1);
        fs::create_dir(dir.path().join("nested")).unwrap();

        assert_eq!(clean_old_files(dir.path(), 7), 1);
        assert!(!dir.path().join("stale.json").exists());
        assert!(dir.path().join("fresh.json").exists());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_clean_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(clean_old_files(&dir.path().join("absent"), 7), 0);
    }

    #[test]
    fn test_run_all() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(dir.path());
        write_aged(&output.history_dir().join("bots_2025-01-01.html"), "ancient", 30);
        write_aged(&output.history_dir().join("bots_2025-03-01.html"), "recent", 1);
        write_aged(&output.json_dir().join("official_bots_list_2025-01-01.json"), "[]", 30);
        write_aged(&output.logs().join("poe_crawler_2025-01-01.log"), "", 30);

        let report = run(&MaintenanceTasks::all(7), &output);

        assert_eq!(report.removed_files, 3);
        assert!(report.index.is_some());
        assert!(report.timeline_index.is_none());
        let index = output.result_dir().join("index.html");
        assert_eq!(fs::read_to_string(index).unwrap(), "recent");
    }

    #[test]
    fn test_run_index_only() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(dir.path());
        write_aged(&output.json_dir().join("old.json"), "[]", 30);

        let tasks = MaintenanceTasks {
            update_index: true,
            clean_old_files: false,
            days: 7,
        };
        let report = run(&tasks, &output);
        assert_eq!(report.removed_files, 0);
        assert!(output.json_dir().join("old.json").exists());
    }
}
