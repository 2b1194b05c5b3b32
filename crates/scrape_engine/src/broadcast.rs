use std::sync::{Arc, Mutex};

use scrape_core::{LogEntry, Severity};
use scrape_logging::{scrape_error, scrape_info, scrape_warn};
use tokio::sync::broadcast;

/// Default bound on un-consumed lines per subscriber.
pub const DEFAULT_LOG_CAPACITY: usize = 1024;

/// Fan-out of job log lines to any number of live subscribers.
///
/// Backed by `tokio::sync::broadcast`: publishing never waits on receivers,
/// and a subscriber that falls more than the channel capacity behind observes
/// `Lagged` and loses lines instead of stalling the walk. Subscribers joining
/// mid-run only see subsequent lines; the retained history covers the rest.
#[derive(Debug, Clone)]
pub struct LogBroadcaster {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    history: Mutex<Vec<LogEntry>>,
    sender: broadcast::Sender<LogEntry>,
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl LogBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(Inner {
                history: Mutex::new(Vec::new()),
                sender,
            }),
        }
    }

    /// Appends to history, mirrors to the process logger and pushes to every
    /// live subscriber. A zero-subscriber send is not an error.
    pub fn publish(&self, severity: Severity, message: impl Into<String>) {
        let entry = LogEntry::new(severity, message);
        let line = entry.to_line();
        match severity {
            Severity::Warning => scrape_warn!("{line}"),
            Severity::Error => scrape_error!("{line}"),
            Severity::Info | Severity::Success => scrape_info!("{line}"),
        }

        self.inner
            .history
            .lock()
            .expect("log history lock poisoned")
            .push(entry.clone());
        let _ = self.inner.sender.send(entry);
    }

    /// Registers a new subscriber. Dropping the receiver unsubscribes it;
    /// nothing is replayed to late joiners.
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.inner.sender.subscribe()
    }

    /// Clears retained history. Called when a new job starts.
    pub fn clear(&self) {
        self.inner
            .history
            .lock()
            .expect("log history lock poisoned")
            .clear();
    }

    pub fn history(&self) -> Vec<LogEntry> {
        self.inner
            .history
            .lock()
            .expect("log history lock poisoned")
            .clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }
}
