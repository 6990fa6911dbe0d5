use crate::domain::entities::RefreshError;
use thiserror::Error;

/// Failures surfaced by a repository backend.
///
/// `CommandFailed` keeps the manager's raw diagnostic text verbatim so the
/// refresh flow can hand it to the classifier and the presentation layer can
/// show it as-is for add/modify/delete.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with status {code:?}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        diagnostic: String,
    },

    #[error("operation was cancelled")]
    Cancelled,

    #[error("invalid repository: {0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

impl BackendError {
    /// The raw diagnostic text, when the command ran far enough to produce
    /// any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            BackendError::CommandFailed { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }
}

/// Outcome of a failed refresh: either a classified manager error, or a
/// transport-level failure that never produced classifiable output.
#[derive(Debug, Error)]
pub enum RefreshFailure {
    #[error("refresh failed: {0:?}")]
    Classified(RefreshError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
