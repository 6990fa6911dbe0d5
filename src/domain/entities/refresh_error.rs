/// Why a repository refresh failed, classified from the manager's raw
/// diagnostic output. Exactly one variant per classification; the mapping is
/// a pure function of the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// Diagnostic text didn't match any recognized pattern.
    Unknown,
    /// Another process holds the manager's lock.
    Locked { message: String },
    /// One or more repositories were skipped because their signing key is
    /// not yet trusted.
    Untrusted { repos: Vec<String> },
    /// One or more repositories have invalid configuration.
    Invalid { reason: String, repos: Vec<String> },
}

/// User-facing explanatory content for a [`RefreshError`]. The presentation
/// layer decides how to render it; the mapping itself is total and stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub summary: String,
    pub repos: Vec<String>,
    /// Preformatted detail text, e.g. the manager's own reason line.
    pub detail: Option<String>,
    pub hint: Option<String>,
}

impl RefreshError {
    /// Whether re-running the refresh with key import enabled is a sensible
    /// recovery action.
    pub fn is_recoverable_by_trust(&self) -> bool {
        matches!(self, RefreshError::Untrusted { .. })
    }
}
