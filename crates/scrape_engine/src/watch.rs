use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use scrape_core::Severity;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::broadcast::LogBroadcaster;
use crate::progress::ProgressTracker;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        source: notify::Error,
    },
}

/// Filesystem observation of the artifact destination folder.
///
/// On spawn, pre-existing files are scanned and recorded as complete. After
/// that, create/write/rename events feed advisory records into the tracker:
/// a rename-class event whose file has non-zero size counts as a completed
/// download. The watch stops when the value is dropped.
pub struct FolderWatch {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl FolderWatch {
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        dir: &Path,
        tracker: ProgressTracker,
        log: LogBroadcaster,
    ) -> Result<Self, WatchError> {
        log.publish(
            Severity::Info,
            format!("Monitoring downloads in folder: {}", dir.display()),
        );

        scan_existing(dir, &tracker)?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                if let Ok(event) = result {
                    let _ = tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|source| WatchError::Watch {
            path: dir.to_path_buf(),
            source,
        })?;
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Watch {
                path: dir.to_path_buf(),
                source,
            })?;

        let task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                apply_event(&tracker, &log, event);
            }
        });

        Ok(Self {
            _watcher: watcher,
            task,
        })
    }
}

impl Drop for FolderWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Files already present when the watch starts are treated as complete.
fn scan_existing(dir: &Path, tracker: &ProgressTracker) -> Result<(), WatchError> {
    let entries = fs::read_dir(dir).map_err(|source| WatchError::Scan {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(meta) = entry.metadata() else { continue };
        if !meta.is_file() {
            continue;
        }
        let Some(name) = file_name(&path) else { continue };
        tracker.observe_event(name, &path, meta.len(), true);
    }
    Ok(())
}

fn apply_event(tracker: &ProgressTracker, log: &LogBroadcaster, event: Event) {
    // Renames (including the atomic-writer's temp-to-final rename) and
    // creates signal a settled file; plain writes are in-flight.
    let rename_class = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(_))
    );
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return;
    }

    for path in event.paths {
        let Some(name) = file_name(&path) else { continue };
        // Temp files from atomic writes are not artifacts.
        if name.starts_with('.') {
            continue;
        }
        let Ok(meta) = fs::metadata(&path) else { continue };
        if !meta.is_file() {
            continue;
        }
        let size = meta.len();
        let complete = rename_class && size > 0;
        tracker.observe_event(name, &path, size, complete);

        let status = if complete { "Downloaded" } else { "Downloading" };
        let severity = if complete {
            Severity::Success
        } else {
            Severity::Info
        };
        log.publish(
            severity,
            format!("{status}: {name} ({})", format_size(size)),
        );
    }
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Human-readable size for log lines: `0 B`, `512 B`, `1.50 KB`, ...
fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::format_size;

    #[test]
    fn formats_sizes_with_two_decimals_above_a_kilobyte() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }
}
