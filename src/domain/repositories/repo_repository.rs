use crate::domain::entities::{ErrorMessage, RefreshError, Repository};
use crate::domain::errors::BackendError;
use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A repository refresh in flight. The underlying command keeps running until
/// it finishes, fails, or [`cancel`](RefreshHandle::cancel) is called, in
/// which case the pending result settles to [`BackendError::Cancelled`].
pub struct RefreshHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), BackendError>>,
}

impl RefreshHandle {
    pub fn new(
        cancel: oneshot::Sender<()>,
        task: JoinHandle<Result<(), BackendError>>,
    ) -> Self {
        Self {
            cancel: Some(cancel),
            task,
        }
    }

    /// Request early termination of the running refresh. Idempotent; has no
    /// effect once the operation has settled.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the refresh to settle.
    pub async fn wait(self) -> Result<(), BackendError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(BackendError::Cancelled),
            Err(e) => Err(BackendError::Internal(e.to_string())),
        }
    }
}

/// One package manager's repository operations. Only a zypper implementation
/// exists today; callers depend on this trait so further managers can slot in
/// without touching the layers above.
#[async_trait]
pub trait RepoRepository: Send + Sync {
    /// Full listing, `index` assigned 1..N in document order.
    async fn get_repos(&self) -> Result<Vec<Repository>, BackendError>;

    /// Opaque fingerprint of the current repository set. Compared by equality
    /// only, never parsed.
    async fn get_repos_hash(&self) -> Result<String, BackendError>;

    async fn add_repo(&self, repo: &Repository) -> Result<(), BackendError>;

    /// Addressed by `index`; never re-supplies `uri` or `alias`, which are
    /// immutable after creation.
    async fn modify_repo(&self, repo: &Repository) -> Result<(), BackendError>;

    /// Addressed by `index`.
    async fn delete_repo(&self, repo: &Repository) -> Result<(), BackendError>;

    /// Refresh one repository, or all of them when `repo` is `None`.
    /// `import_keys` makes the manager accept any new signing keys it
    /// encounters; used as the recovery action after an
    /// [`RefreshError::Untrusted`] classification.
    fn refresh_repos(&self, repo: Option<&Repository>, import_keys: bool) -> RefreshHandle;

    /// Classify a failed refresh's raw diagnostic text. Pure function of the
    /// input.
    fn parse_error(&self, diagnostic: &str) -> RefreshError;

    /// User-facing content for a classification. Total over all variants.
    fn error_message(&self, error: &RefreshError) -> ErrorMessage;
}
