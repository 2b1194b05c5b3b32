use thiserror::Error;
use url::Url;

use crate::naming::sanitize_folder_name;

/// Parameters for one scrape run.
///
/// `start_index` and `last_index` are the user-facing 1-based inclusive row
/// selection; see [`crate::effective_row_range`] for the translation the walk
/// applies per table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub login_url: String,
    pub table_urls: Vec<String>,
    pub folder_name: String,
    pub start_index: usize,
    pub last_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobSpecError {
    #[error("login URL is required")]
    MissingLoginUrl,
    #[error("login URL is not a valid URL: {0}")]
    InvalidLoginUrl(String),
    #[error("at least one table URL is required")]
    NoTableUrls,
    #[error("table URL is not a valid URL: {0}")]
    InvalidTableUrl(String),
    #[error("folder name is required")]
    MissingFolderName,
}

impl JobSpec {
    pub fn new(
        login_url: impl Into<String>,
        table_urls: Vec<String>,
        folder_name: impl Into<String>,
    ) -> Self {
        Self {
            login_url: login_url.into(),
            table_urls,
            folder_name: folder_name.into(),
            start_index: 1,
            last_index: None,
        }
    }

    pub fn with_row_range(mut self, start_index: usize, last_index: Option<usize>) -> Self {
        self.start_index = start_index.max(1);
        self.last_index = last_index;
        self
    }

    /// Checks the spec before any work begins. The engine surfaces failures
    /// synchronously to the caller as `InvalidInput`.
    pub fn validate(&self) -> Result<(), JobSpecError> {
        if self.login_url.trim().is_empty() {
            return Err(JobSpecError::MissingLoginUrl);
        }
        if Url::parse(self.login_url.trim()).is_err() {
            return Err(JobSpecError::InvalidLoginUrl(self.login_url.clone()));
        }
        if self.table_urls.is_empty() {
            return Err(JobSpecError::NoTableUrls);
        }
        for table_url in &self.table_urls {
            if Url::parse(table_url.trim()).is_err() {
                return Err(JobSpecError::InvalidTableUrl(table_url.clone()));
            }
        }
        if self.safe_folder_name().is_empty() {
            return Err(JobSpecError::MissingFolderName);
        }
        Ok(())
    }

    /// The destination folder name after filesystem sanitization.
    pub fn safe_folder_name(&self) -> String {
        sanitize_folder_name(&self.folder_name)
    }
}
