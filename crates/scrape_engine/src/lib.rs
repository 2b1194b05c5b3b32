//! Scrape engine: the job orchestrator and its IO seams.
//!
//! [`ScrapeEngine`] owns the single active job: it drives a
//! [`BrowserSession`] through the table/row walk, renders one artifact per
//! row through an [`ArtifactRenderer`], tracks completion in the
//! [`ProgressTracker`] and streams log lines through the [`LogBroadcaster`].
//! The browser automation itself and the HTTP surface are external; they
//! plug in at the `SessionFactory` trait and the engine's public methods.
mod broadcast;
mod engine;
mod persist;
mod progress;
mod render;
mod session;
mod settings;
mod watch;

pub use broadcast::{LogBroadcaster, DEFAULT_LOG_CAPACITY};
pub use engine::{ScrapeEngine, StartError};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use progress::{ArtifactRecord, ProgressSnapshot, ProgressTracker};
pub use render::{ArtifactRenderer, RenderError, RenderSettings, RenderedArtifact, TextSnapshotRenderer};
pub use session::{BrowserSession, SessionError, SessionFactory, WindowId};
pub use settings::EngineSettings;
pub use watch::{FolderWatch, WatchError};
