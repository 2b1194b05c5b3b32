use std::path::PathBuf;
use std::time::Duration;

use scrape_core::{BlackoutWindow, BlockedContentDetector};

use crate::broadcast::DEFAULT_LOG_CAPACITY;

/// Tunables for the orchestrator. Callers override fields off `Default`.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Root under which each job's named artifact folder is created.
    pub output_root: PathBuf,
    /// Marker pattern the session uses to locate table rows.
    pub row_selector: String,
    /// How many leading cells feed the artifact name.
    pub lead_cells: usize,
    /// Bound on locating rows after opening a table tab. Exceeding it skips
    /// the table, not the job.
    pub table_load_timeout: Duration,
    /// Pause after opening the login page.
    pub post_login_pause: Duration,
    /// Pause after opening a table tab, before locating rows.
    pub tab_open_settle: Duration,
    /// Pause after clicking a row, before inspecting the page.
    pub row_click_settle: Duration,
    pub blocked: BlockedContentDetector,
    pub blackout: BlackoutWindow,
    pub log_capacity: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("artifact_output"),
            row_selector: r#"tr[id^="R"]"#.to_string(),
            lead_cells: 3,
            table_load_timeout: Duration::from_secs(10),
            post_login_pause: Duration::from_secs(2),
            tab_open_settle: Duration::from_secs(3),
            row_click_settle: Duration::from_secs(3),
            blocked: BlockedContentDetector::default(),
            blackout: BlackoutWindow::default(),
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}
