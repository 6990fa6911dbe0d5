use crate::domain::{
    entities::{ErrorMessage, RefreshError, Repository},
    errors::{BackendError, RefreshFailure},
    repositories::{RefreshHandle, RepoRepository},
    services::RepoValidator,
};
use std::sync::Arc;

pub struct ListRepos {
    repository: Arc<dyn RepoRepository>,
}

impl ListRepos {
    pub fn new(repository: Arc<dyn RepoRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<Vec<Repository>, BackendError> {
        self.repository.get_repos().await
    }
}

pub struct FingerprintRepos {
    repository: Arc<dyn RepoRepository>,
}

impl FingerprintRepos {
    pub fn new(repository: Arc<dyn RepoRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<String, BackendError> {
        self.repository.get_repos_hash().await
    }
}

pub struct AddRepo {
    repository: Arc<dyn RepoRepository>,
}

impl AddRepo {
    pub fn new(repository: Arc<dyn RepoRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, repo: Repository) -> Result<(), BackendError> {
        RepoValidator::validate_repo(&repo).map_err(BackendError::Validation)?;
        self.repository.add_repo(&repo).await
    }
}

pub struct ModifyRepo {
    repository: Arc<dyn RepoRepository>,
}

impl ModifyRepo {
    pub fn new(repository: Arc<dyn RepoRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, repo: Repository) -> Result<(), BackendError> {
        RepoValidator::validate_repo(&repo).map_err(BackendError::Validation)?;
        self.repository.modify_repo(&repo).await
    }
}

pub struct DeleteRepo {
    repository: Arc<dyn RepoRepository>,
}

impl DeleteRepo {
    pub fn new(repository: Arc<dyn RepoRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, repo: Repository) -> Result<(), BackendError> {
        self.repository.delete_repo(&repo).await
    }
}

pub struct RefreshRepos {
    repository: Arc<dyn RepoRepository>,
}

impl RefreshRepos {
    pub fn new(repository: Arc<dyn RepoRepository>) -> Self {
        Self { repository }
    }

    /// Kick off a refresh and hand back the cancellable handle.
    pub fn start(&self, repo: Option<&Repository>, import_keys: bool) -> RefreshHandle {
        self.repository.refresh_repos(repo, import_keys)
    }

    /// Run a refresh to completion. Manager failures come back classified;
    /// re-running with `import_keys = true` is the recovery path when the
    /// classification is [`RefreshError::Untrusted`].
    pub async fn execute(
        &self,
        repo: Option<&Repository>,
        import_keys: bool,
    ) -> Result<(), RefreshFailure> {
        match self.start(repo, import_keys).wait().await {
            Ok(()) => Ok(()),
            Err(BackendError::CommandFailed { diagnostic, .. }) => Err(
                RefreshFailure::Classified(self.repository.parse_error(&diagnostic)),
            ),
            Err(other) => Err(RefreshFailure::Backend(other)),
        }
    }

    pub fn error_message(&self, error: &RefreshError) -> ErrorMessage {
        self.repository.error_message(error)
    }
}
