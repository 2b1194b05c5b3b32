/// Keywords that mark a detail page as blocked, matched case-insensitively.
///
/// A hit is fatal for the whole job: a blocking page is taken to mean the
/// remote site has invalidated the session.
pub const DEFAULT_BLOCKED_KEYWORDS: &[&str] = &[
    "no data",
    "session expired",
    "error",
    "maintenance",
    "not available",
    "temporarily unavailable",
    "try again later",
    "invalid",
    "unauthorized",
    "forbidden",
    "user validation required to continue",
];

/// Classifies captured page text against a configurable keyword list.
///
/// Matching runs over the entire page text without scoping to a content
/// region, so a page that incidentally contains a keyword in unrelated copy
/// is still classified as blocked. Narrow the list if that bites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedContentDetector {
    keywords: Vec<String>,
}

impl Default for BlockedContentDetector {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCKED_KEYWORDS.iter().copied())
    }
}

impl BlockedContentDetector {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Returns the first keyword found in `page_text`, if any.
    pub fn find(&self, page_text: &str) -> Option<&str> {
        let haystack = page_text.to_lowercase();
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|keyword| haystack.contains(*keyword))
    }
}
