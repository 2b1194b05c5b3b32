use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<PersistError> for RenderError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::OutputDir(msg) => RenderError::OutputDir(msg),
            PersistError::Io(err) => RenderError::Io(err),
        }
    }
}

/// A stored artifact, with the size reported by the filesystem after the
/// write settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Turns a captured detail page into a stored document.
///
/// One artifact per processed row. A render that produces a zero-byte file is
/// reported through `size_bytes`, not as an error; the orchestrator records
/// the row as incomplete and moves on.
pub trait ArtifactRenderer: Send + Sync {
    /// File extension (without the dot) for artifacts this renderer writes.
    fn extension(&self) -> &str;

    fn render(
        &self,
        dir: &Path,
        filename: &str,
        title: &str,
        page_text: &str,
    ) -> Result<RenderedArtifact, RenderError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Captured page text is truncated to this many characters.
    pub max_chars: usize,
    pub extension: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_chars: 2000,
            extension: "txt".to_string(),
        }
    }
}

/// Best-effort textual capture: page title, capture timestamp and the
/// whitespace-condensed page text, truncated per settings. No layout or
/// image fidelity.
#[derive(Debug, Clone, Default)]
pub struct TextSnapshotRenderer {
    settings: RenderSettings,
}

impl TextSnapshotRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }
}

impl ArtifactRenderer for TextSnapshotRenderer {
    fn extension(&self) -> &str {
        &self.settings.extension
    }

    fn render(
        &self,
        dir: &Path,
        filename: &str,
        title: &str,
        page_text: &str,
    ) -> Result<RenderedArtifact, RenderError> {
        let condensed = condense(page_text, self.settings.max_chars);
        let document = format!(
            "{title}\nCaptured on: {}\n\nDocument content from web page:\n\n{condensed}\n",
            Utc::now().to_rfc3339(),
        );

        let writer = AtomicFileWriter::new(dir.to_path_buf());
        let path = writer.write(filename, document.as_bytes())?;
        let size_bytes = fs::metadata(&path)?.len();
        Ok(RenderedArtifact { path, size_bytes })
    }
}

/// Collapses runs of whitespace to single spaces and truncates to `max_chars`
/// characters (not bytes), appending an ellipsis marker when cut.
fn condense(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let mut cut = collapsed[..byte_index].to_string();
            cut.push_str("...");
            cut
        }
        None => collapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::condense;

    #[test]
    fn condense_collapses_whitespace() {
        assert_eq!(condense("a\n\n  b\t c", 100), "a b c");
    }

    #[test]
    fn condense_truncates_on_char_boundaries() {
        assert_eq!(condense("αβγδε", 3), "αβγ...");
        assert_eq!(condense("abc", 3), "abc");
    }
}
