use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use scrape_core::{
    artifact_name, effective_row_range, fallback_artifact_name, JobPhase, JobSpec, JobSpecError,
    LogEntry, Severity,
};
use thiserror::Error;
use tokio::sync::{broadcast, Notify};
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

use crate::progress::{ProgressSnapshot, ProgressTracker};
use crate::render::ArtifactRenderer;
use crate::session::{BrowserSession, SessionError, SessionFactory, WindowId};
use crate::settings::EngineSettings;
use crate::watch::FolderWatch;
use crate::LogBroadcaster;

/// Rejections surfaced synchronously to the caller, before any work begins.
/// Once a job is accepted, outcomes are observable only through the log
/// stream and the progress snapshot.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("a scraping operation is already in progress")]
    AlreadyActive,
    #[error("target site is in its maintenance window")]
    MaintenanceWindow,
    #[error("invalid job parameters: {0}")]
    InvalidInput(#[from] JobSpecError),
    #[error("failed to create artifact directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: io::Error,
    },
}

/// The single-job scrape controller.
///
/// At most one job is active at a time; `start` hands the walk to a
/// background task and returns immediately. `abort` is cooperative: it
/// cancels a token the walk checks at row and table boundaries, and the walk
/// task performs the only session teardown, so the two paths can never race
/// into a double-close.
pub struct ScrapeEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    sessions: Arc<dyn SessionFactory>,
    renderer: Arc<dyn ArtifactRenderer>,
    settings: EngineSettings,
    tracker: ProgressTracker,
    log: LogBroadcaster,
    active: AtomicBool,
    phase: Mutex<JobPhase>,
    cancel: Mutex<Option<CancellationToken>>,
    watch: Mutex<Option<FolderWatch>>,
    idle: Notify,
}

impl ScrapeEngine {
    pub fn new(
        sessions: Arc<dyn SessionFactory>,
        renderer: Arc<dyn ArtifactRenderer>,
        settings: EngineSettings,
    ) -> Self {
        let log = LogBroadcaster::new(settings.log_capacity);
        Self {
            inner: Arc::new(EngineInner {
                sessions,
                renderer,
                settings,
                tracker: ProgressTracker::new(),
                log,
                active: AtomicBool::new(false),
                phase: Mutex::new(JobPhase::Idle),
                cancel: Mutex::new(None),
                watch: Mutex::new(None),
                idle: Notify::new(),
            }),
        }
    }

    /// Accepts or rejects a job. On acceptance the walk runs on a spawned
    /// task and this returns immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, spec: JobSpec) -> Result<(), StartError> {
        if self
            .inner
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(StartError::AlreadyActive);
        }

        match self.prepare(&spec) {
            Ok((dir, token)) => {
                self.inner.set_phase(JobPhase::Initializing);
                tokio::spawn(run_job(self.inner.clone(), spec, dir, token));
                Ok(())
            }
            Err(err) => {
                self.inner.active.store(false, Ordering::SeqCst);
                Err(err)
            }
        }
    }

    /// Pre-start checks and setup. Any failure here leaves no job behind.
    fn prepare(&self, spec: &JobSpec) -> Result<(PathBuf, CancellationToken), StartError> {
        let inner = &self.inner;
        if inner.settings.blackout.in_blackout(Utc::now()) {
            return Err(StartError::MaintenanceWindow);
        }
        spec.validate()?;

        let dir = inner.settings.output_root.join(spec.safe_folder_name());
        fs::create_dir_all(&dir).map_err(|source| StartError::OutputDir {
            path: dir.clone(),
            source,
        })?;

        inner.log.clear();
        inner.tracker.reset();
        inner.log.publish(
            Severity::Info,
            format!("Artifacts will be saved to: {}", dir.display()),
        );

        // Filesystem observation is advisory; a watch failure degrades the
        // progress feed but does not reject the job.
        match FolderWatch::spawn(&dir, inner.tracker.clone(), inner.log.clone()) {
            Ok(watch) => {
                *inner.watch.lock().expect("watch lock poisoned") = Some(watch);
            }
            Err(err) => {
                inner
                    .log
                    .publish(Severity::Warning, format!("Folder watch unavailable: {err}"));
            }
        }

        let token = CancellationToken::new();
        *inner.cancel.lock().expect("cancel lock poisoned") = Some(token.clone());
        Ok((dir, token))
    }

    /// Requests cooperative cancellation. Idempotent; safe to call with no
    /// job active, and always acknowledged with a log line. The walk
    /// observes the token after the in-flight row.
    pub fn abort(&self) {
        let token = self
            .inner
            .cancel
            .lock()
            .expect("cancel lock poisoned")
            .clone();
        match token {
            Some(token) if !token.is_cancelled() => {
                token.cancel();
                self.inner.log.publish(
                    Severity::Info,
                    "Abort requested; stopping at the next row boundary",
                );
            }
            Some(_) => {
                self.inner
                    .log
                    .publish(Severity::Info, "Abort already requested");
            }
            None => {
                self.inner
                    .log
                    .publish(Severity::Info, "No active job to abort");
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> JobPhase {
        *self.inner.phase.lock().expect("phase lock poisoned")
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.inner.tracker.snapshot()
    }

    /// Registers a live log subscriber; only lines published after the call
    /// are delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.inner.log.subscribe()
    }

    /// Lines retained since the current (or last) job started.
    pub fn history(&self) -> Vec<LogEntry> {
        self.inner.log.history()
    }

    /// Resolves once no job is active. Returns immediately when idle.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if !self.is_active() {
                return;
            }
            notified.await;
        }
    }
}

impl EngineInner {
    fn set_phase(&self, phase: JobPhase) {
        *self.phase.lock().expect("phase lock poisoned") = phase;
    }
}

/// Terminal result of one walk. Logging happens at the point of detection;
/// this only picks the closing line and phase.
enum WalkOutcome {
    Completed,
    Aborted,
    Blocked,
    Failed,
}

/// Result of one table pass inside a healthy session.
enum TableOutcome {
    Done,
    /// Recoverable: this table is skipped, the walk continues.
    Skipped,
    Aborted,
    /// Fatal: blocking content detected, the whole job stops.
    Blocked,
}

async fn run_job(inner: Arc<EngineInner>, spec: JobSpec, dir: PathBuf, token: CancellationToken) {
    let outcome = walk(&inner, &spec, &dir, &token).await;

    let (phase, line) = match outcome {
        WalkOutcome::Completed => (
            JobPhase::Completed,
            Some((
                Severity::Success,
                format!(
                    "Scraping completed. Artifacts saved in '{}'.",
                    dir.display()
                ),
            )),
        ),
        WalkOutcome::Aborted => (
            JobPhase::Aborted,
            Some((Severity::Info, "Operation aborted".to_string())),
        ),
        // Blocked and Failed already produced their ERROR line.
        WalkOutcome::Blocked | WalkOutcome::Failed => (JobPhase::Failed, None),
    };
    if let Some((severity, message)) = line {
        inner.log.publish(severity, message);
    }

    inner.set_phase(phase);
    *inner.cancel.lock().expect("cancel lock poisoned") = None;
    inner.active.store(false, Ordering::SeqCst);
    inner.idle.notify_waiters();
}

/// Opens the session, drives the tables and tears the session down. The
/// teardown here is the only one in the system; its errors are logged and
/// swallowed.
async fn walk(
    inner: &EngineInner,
    spec: &JobSpec,
    dir: &Path,
    token: &CancellationToken,
) -> WalkOutcome {
    let log = &inner.log;

    let mut session = match inner.sessions.open(&spec.login_url).await {
        Ok(session) => session,
        Err(err) => {
            log.publish(
                Severity::Error,
                format!("Error initializing browser session: {err}"),
            );
            return WalkOutcome::Failed;
        }
    };
    log.publish(Severity::Info, "Opened login page");
    sleep(inner.settings.post_login_pause).await;

    let outcome = drive_tables(inner, spec, dir, token, session.as_mut()).await;

    match session.terminate().await {
        Ok(()) => log.publish(Severity::Info, "Browser closed"),
        Err(err) => log.publish(Severity::Error, format!("Error closing browser: {err}")),
    }
    outcome
}

async fn drive_tables(
    inner: &EngineInner,
    spec: &JobSpec,
    dir: &Path,
    token: &CancellationToken,
    session: &mut dyn BrowserSession,
) -> WalkOutcome {
    let log = &inner.log;

    let home = match session.windows().await {
        Ok(windows) => windows.into_iter().next(),
        Err(err) => {
            log.publish(Severity::Error, format!("Error: {err}"));
            return WalkOutcome::Failed;
        }
    };

    for (table_index, table_url) in spec.table_urls.iter().enumerate() {
        if token.is_cancelled() {
            return WalkOutcome::Aborted;
        }
        inner.set_phase(JobPhase::TableLoop);
        let table_no = table_index + 1;
        log.publish(Severity::Info, format!("Opening table URL {table_no}"));

        match process_table(
            inner,
            spec,
            dir,
            token,
            session,
            table_url,
            table_no,
            home.as_ref(),
        )
        .await
        {
            Ok(TableOutcome::Done | TableOutcome::Skipped) => {}
            Ok(TableOutcome::Aborted) => return WalkOutcome::Aborted,
            Ok(TableOutcome::Blocked) => return WalkOutcome::Blocked,
            Err(err) => {
                // Any driver failure mid-walk invalidates the session.
                log.publish(Severity::Error, format!("Error: {err}"));
                return WalkOutcome::Failed;
            }
        }
    }

    if token.is_cancelled() {
        return WalkOutcome::Aborted;
    }
    WalkOutcome::Completed
}

#[allow(clippy::too_many_arguments)]
async fn process_table(
    inner: &EngineInner,
    spec: &JobSpec,
    dir: &Path,
    token: &CancellationToken,
    session: &mut dyn BrowserSession,
    table_url: &str,
    table_no: usize,
    home: Option<&WindowId>,
) -> Result<TableOutcome, SessionError> {
    let settings = &inner.settings;
    let log = &inner.log;

    session.navigate_new_tab(table_url).await?;
    let table_tab = session.windows().await?.into_iter().last();
    if let Some(tab) = &table_tab {
        session.switch_to(tab).await?;
    }
    sleep(settings.tab_open_settle).await;

    let row_count = match timeout(
        settings.table_load_timeout,
        session.find_rows(&settings.row_selector),
    )
    .await
    {
        Ok(Ok(count)) if count > 0 => count,
        Ok(Err(err)) => return Err(err),
        // Timed out or came back empty: recoverable, skip this table.
        Ok(Ok(_)) | Err(_) => {
            log.publish(
                Severity::Warning,
                format!(
                    "Table {table_no} took too long to load or has too much data. Skipping this table."
                ),
            );
            close_table_tab(session, table_tab.as_ref(), home).await?;
            return Ok(TableOutcome::Skipped);
        }
    };
    log.publish(
        Severity::Info,
        format!("Found {row_count} rows in table {table_no}"),
    );

    let mut aborted = false;
    for index in effective_row_range(spec.start_index, spec.last_index, row_count) {
        if token.is_cancelled() {
            aborted = true;
            break;
        }
        inner.set_phase(JobPhase::RowLoop);
        let row_no = index + 1;
        log.publish(Severity::Info, format!("Processing row {row_no}"));

        // Re-resolve: the previous click may have mutated the row list.
        let fresh_count = session.find_rows(&settings.row_selector).await?;
        if index >= fresh_count {
            log.publish(
                Severity::Warning,
                format!("Row {row_no} is gone after the table refreshed; leaving table {table_no}."),
            );
            break;
        }

        session.click_row(&settings.row_selector, index).await?;
        sleep(settings.row_click_settle).await;

        let page_text = session.page_text().await?;
        if let Some(keyword) = settings.blocked.find(&page_text) {
            log.publish(
                Severity::Error,
                format!(
                    "Unexpected content detected on row {row_no} (matched \"{keyword}\"). Stopping automation."
                ),
            );
            return Ok(TableOutcome::Blocked);
        }

        let filename = match session
            .row_cells(&settings.row_selector, index, settings.lead_cells)
            .await
        {
            Ok(cells) => artifact_name(&cells, settings.lead_cells, inner.renderer.extension()),
            Err(err) => {
                log.publish(Severity::Error, format!("Error extracting row data: {err}"));
                fallback_artifact_name(table_no, row_no, inner.renderer.extension())
            }
        };

        let title = session.page_title().await?;
        match inner.renderer.render(dir, &filename, &title, &page_text) {
            Ok(artifact) if artifact.size_bytes > 0 => {
                inner
                    .tracker
                    .record_rendered(&filename, &artifact.path, artifact.size_bytes, true);
                log.publish(
                    Severity::Success,
                    format!("Saved: {filename} ({} bytes)", artifact.size_bytes),
                );
            }
            Ok(artifact) => {
                inner
                    .tracker
                    .record_rendered(&filename, &artifact.path, 0, false);
                log.publish(
                    Severity::Warning,
                    format!("{filename} was created but has 0 bytes"),
                );
            }
            // Recoverable: the row is skipped, the walk continues.
            Err(err) => {
                log.publish(Severity::Error, format!("{filename} was not created: {err}"));
            }
        }
    }

    close_table_tab(session, table_tab.as_ref(), home).await?;
    Ok(if aborted {
        TableOutcome::Aborted
    } else {
        TableOutcome::Done
    })
}

/// Closes the table's tab and returns focus to the home tab.
async fn close_table_tab(
    session: &mut dyn BrowserSession,
    table_tab: Option<&WindowId>,
    home: Option<&WindowId>,
) -> Result<(), SessionError> {
    if let Some(tab) = table_tab {
        session.close_window(tab).await?;
    }
    if let Some(home) = home {
        session.switch_to(home).await?;
    }
    Ok(())
}
