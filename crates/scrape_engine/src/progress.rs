use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

/// One entry per observed artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRecord {
    pub name: String,
    pub path: String,
    pub size_bytes: u64,
    pub complete: bool,
}

/// Point-in-time read model of a run's output. Always a detached copy;
/// records are in name order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ProgressSnapshot {
    pub records: Vec<ArtifactRecord>,
    pub total_count: usize,
    pub completed_count: usize,
    pub total_bytes: u64,
}

/// Shared artifact-completion map, written by the walk task and the folder
/// watcher, read by anyone.
///
/// Two write paths feed it: [`record_rendered`](Self::record_rendered) is the
/// authoritative render-and-verify signal from the orchestrator, while
/// [`observe_event`](Self::observe_event) is the advisory filesystem signal.
/// The advisory path never downgrades a record the orchestrator has already
/// verified.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    records: Arc<Mutex<BTreeMap<String, ArtifactRecord>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all records. Called once at job start.
    pub fn reset(&self) {
        self.records.lock().expect("tracker lock poisoned").clear();
    }

    /// Authoritative upsert from the orchestrator after a render settled.
    pub fn record_rendered(&self, name: &str, path: &Path, size_bytes: u64, complete: bool) {
        let mut records = self.records.lock().expect("tracker lock poisoned");
        records.insert(
            name.to_string(),
            ArtifactRecord {
                name: name.to_string(),
                path: path.display().to_string(),
                size_bytes,
                complete,
            },
        );
    }

    /// Advisory upsert from filesystem observation. A record already marked
    /// complete stays complete, and keeps its verified size when the event
    /// catches the file mid-rewrite at zero bytes; a complete record never
    /// reports an empty file.
    pub fn observe_event(&self, name: &str, path: &Path, size_bytes: u64, complete: bool) {
        let mut records = self.records.lock().expect("tracker lock poisoned");
        match records.get_mut(name) {
            Some(record) if record.complete => {
                record.path = path.display().to_string();
                if size_bytes > 0 {
                    record.size_bytes = size_bytes;
                }
            }
            _ => {
                records.insert(
                    name.to_string(),
                    ArtifactRecord {
                        name: name.to_string(),
                        path: path.display().to_string(),
                        size_bytes,
                        complete,
                    },
                );
            }
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let records = self.records.lock().expect("tracker lock poisoned");
        let records: Vec<ArtifactRecord> = records.values().cloned().collect();
        let total_count = records.len();
        let completed_count = records.iter().filter(|record| record.complete).count();
        let total_bytes = records.iter().map(|record| record.size_bytes).sum();
        ProgressSnapshot {
            records,
            total_count,
            completed_count,
            total_bytes,
        }
    }
}
