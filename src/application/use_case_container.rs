use crate::application::use_cases::*;
use crate::domain::repositories::RepoRepository;
use std::sync::Arc;

pub struct UseCaseContainer {
    pub list: Arc<ListRepos>,
    pub fingerprint: Arc<FingerprintRepos>,
    pub add: Arc<AddRepo>,
    pub modify: Arc<ModifyRepo>,
    pub delete: Arc<DeleteRepo>,
    pub refresh: Arc<RefreshRepos>,
}

impl UseCaseContainer {
    pub fn new(repository: Arc<dyn RepoRepository>) -> Self {
        Self {
            list: Arc::new(ListRepos::new(Arc::clone(&repository))),
            fingerprint: Arc::new(FingerprintRepos::new(Arc::clone(&repository))),
            add: Arc::new(AddRepo::new(Arc::clone(&repository))),
            modify: Arc::new(ModifyRepo::new(Arc::clone(&repository))),
            delete: Arc::new(DeleteRepo::new(Arc::clone(&repository))),
            refresh: Arc::new(RefreshRepos::new(Arc::clone(&repository))),
        }
    }
}
