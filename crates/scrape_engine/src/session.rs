use thiserror::Error;

/// Opaque identifier for one browser tab/window. The first entry returned by
/// [`BrowserSession::windows`] is the "home" tab the walk returns to between
/// tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowId(pub String);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to open browser session: {0}")]
    Open(String),
    #[error("browser driver error: {0}")]
    Driver(String),
}

/// The browser-automation capability the orchestrator drives.
///
/// One session is a single serial resource: the walk never drives two tabs
/// concurrently, and the walk task is the only caller for the lifetime of a
/// job. Row lookups take the selector each time because a click may mutate
/// the DOM; implementations must re-resolve rather than cache elements.
#[async_trait::async_trait]
pub trait BrowserSession: Send {
    /// Opens `url` in a new tab without switching to it.
    async fn navigate_new_tab(&mut self, url: &str) -> Result<(), SessionError>;

    /// All open windows, oldest first.
    async fn windows(&mut self) -> Result<Vec<WindowId>, SessionError>;

    async fn switch_to(&mut self, window: &WindowId) -> Result<(), SessionError>;

    /// Waits for row elements matching `selector` in the current tab and
    /// returns how many there are. Implementations may block until rows
    /// appear; the orchestrator bounds the wait with its own timeout.
    async fn find_rows(&mut self, selector: &str) -> Result<usize, SessionError>;

    /// Clicks the `index`-th row matching `selector`, re-resolving the list.
    async fn click_row(&mut self, selector: &str, index: usize) -> Result<(), SessionError>;

    /// The text of the first `count` cells of the `index`-th row.
    async fn row_cells(
        &mut self,
        selector: &str,
        index: usize,
        count: usize,
    ) -> Result<Vec<String>, SessionError>;

    /// Rendered text of the current page.
    async fn page_text(&mut self) -> Result<String, SessionError>;

    async fn page_title(&mut self) -> Result<String, SessionError>;

    async fn close_window(&mut self, window: &WindowId) -> Result<(), SessionError>;

    /// Tears the whole session down. Called exactly once per job, by the
    /// walk task.
    async fn terminate(&mut self) -> Result<(), SessionError>;
}

/// Opens sessions against the login page. The production implementation is a
/// WebDriver client; tests script a fake.
#[async_trait::async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self, login_url: &str) -> Result<Box<dyn BrowserSession>, SessionError>;
}
