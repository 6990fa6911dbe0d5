use crate::domain::entities::{ErrorMessage, Repository};
use serde::{Deserialize, Serialize};

/// Serializable repository record for the presentation boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoDto {
    pub index: usize,
    pub alias: String,
    pub name: String,
    pub priority: i64,
    pub enabled: bool,
    pub autorefresh: bool,
    pub gpgcheck: bool,
    pub uri: String,
}

impl From<Repository> for RepoDto {
    fn from(repo: Repository) -> Self {
        Self {
            index: repo.index,
            alias: repo.alias,
            name: repo.name,
            priority: repo.priority,
            enabled: repo.enabled,
            autorefresh: repo.autorefresh,
            gpgcheck: repo.gpgcheck,
            uri: repo.uri,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessageDto {
    pub summary: String,
    pub repos: Vec<String>,
    pub detail: Option<String>,
    pub hint: Option<String>,
}

impl From<ErrorMessage> for ErrorMessageDto {
    fn from(message: ErrorMessage) -> Self {
        Self {
            summary: message.summary,
            repos: message.repos,
            detail: message.detail,
            hint: message.hint,
        }
    }
}
