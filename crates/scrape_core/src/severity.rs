use serde::{Deserialize, Serialize};

/// Log-line severity. `Warning` and `Error` lines carry a bracketed prefix
/// on the wire; `Info` and `Success` lines are bare text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

impl Severity {
    /// Recovers the severity from a formatted line's prefix. Lines without a
    /// recognized prefix are `Info`.
    pub fn infer(line: &str) -> Self {
        if line.starts_with("[WARNING]") {
            Severity::Warning
        } else if line.starts_with("[ERROR]") {
            Severity::Error
        } else if line.starts_with("[SUCCESS]") {
            Severity::Success
        } else {
            Severity::Info
        }
    }
}

/// One immutable line of job output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
}

impl LogEntry {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    /// Wire form: `[WARNING]`/`[ERROR]` prefixed for those severities,
    /// bare message otherwise.
    pub fn to_line(&self) -> String {
        match self.severity {
            Severity::Warning => format!("[WARNING] {}", self.message),
            Severity::Error => format!("[ERROR] {}", self.message),
            Severity::Info | Severity::Success => self.message.clone(),
        }
    }
}
