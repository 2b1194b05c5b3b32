//! Scrape core: pure decision logic for the orchestrator.
//!
//! Everything in this crate is IO-free: job parameter validation, the walk's
//! index arithmetic, blocked-content classification, artifact naming, the
//! maintenance blackout window and the log-line severity model. The engine
//! crate wires these into a running job.
mod blackout;
mod blocked;
mod job;
mod naming;
mod severity;
mod walk;

pub use blackout::BlackoutWindow;
pub use blocked::{BlockedContentDetector, DEFAULT_BLOCKED_KEYWORDS};
pub use job::{JobSpec, JobSpecError};
pub use naming::{artifact_name, fallback_artifact_name, sanitize_folder_name};
pub use severity::{LogEntry, Severity};
pub use walk::{effective_row_range, JobPhase};
