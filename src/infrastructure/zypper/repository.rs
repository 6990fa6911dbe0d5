use crate::domain::entities::{ErrorMessage, RefreshError, Repository};
use crate::domain::errors::BackendError;
use crate::domain::repositories::{RefreshHandle, RepoRepository};
use crate::infrastructure::zypper::classifier;
use crate::infrastructure::zypper::command::{Privilege, ZypperCommand};
use async_trait::async_trait;
use roxmltree::Document;

/// Digest of the manager's repo-description text; only ever compared for
/// equality, so the choice of hash is irrelevant.
const REPOS_HASH_SCRIPT: &str = "zypper repos -d | md5sum";

pub struct ZypperRepoRepository {
    command: ZypperCommand,
}

impl ZypperRepoRepository {
    pub fn new(command: ZypperCommand) -> Self {
        Self { command }
    }

    fn parse_repo_list(xml: &str) -> Result<Vec<Repository>, BackendError> {
        let doc = Document::parse(xml)
            .map_err(|e| BackendError::Internal(format!("unreadable repo listing: {e}")))?;

        // Malformed entries are kept with defaulted fields rather than
        // aborting the whole listing.
        let repos = doc
            .descendants()
            .filter(|node| node.has_tag_name("repo"))
            .enumerate()
            .map(|(position, node)| Repository {
                index: position + 1,
                alias: node.attribute("alias").unwrap_or_default().to_string(),
                name: node.attribute("name").unwrap_or_default().to_string(),
                priority: node
                    .attribute("priority")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(0),
                enabled: node.attribute("enabled") == Some("1"),
                autorefresh: node.attribute("autorefresh") == Some("1"),
                gpgcheck: node.attribute("gpgcheck") == Some("1"),
                uri: node
                    .children()
                    .find(|child| child.has_tag_name("url"))
                    .and_then(|url| url.text())
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect();

        Ok(repos)
    }

    /// Editable fields as command arguments. Both polarities are always
    /// passed explicitly so zypper's own defaults never apply silently.
    fn editable_flags(repo: &Repository) -> Vec<String> {
        let mut args = vec![
            "-n".to_string(),
            repo.name.clone(),
            "-p".to_string(),
            repo.priority.to_string(),
        ];
        args.push(if repo.enabled { "--enable" } else { "--disable" }.to_string());
        args.push(
            if repo.autorefresh {
                "--refresh"
            } else {
                "--no-refresh"
            }
            .to_string(),
        );
        args.push(
            if repo.gpgcheck {
                "--gpgcheck"
            } else {
                "--no-gpgcheck"
            }
            .to_string(),
        );
        args
    }
}

#[async_trait]
impl RepoRepository for ZypperRepoRepository {
    async fn get_repos(&self) -> Result<Vec<Repository>, BackendError> {
        let output = self
            .command
            .run(
                Privilege::None,
                vec!["--xmlout".to_string(), "repos".to_string()],
            )
            .await?;

        Self::parse_repo_list(&output)
    }

    async fn get_repos_hash(&self) -> Result<String, BackendError> {
        let output = self.command.run_script(REPOS_HASH_SCRIPT).await?;

        Ok(output
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string())
    }

    async fn add_repo(&self, repo: &Repository) -> Result<(), BackendError> {
        let mut args = vec!["addrepo".to_string()];
        args.extend(Self::editable_flags(repo));
        if repo.is_repo_file() {
            args.push("-r".to_string());
            args.push(repo.uri.clone());
        }
        args.push(repo.uri.clone());
        args.push(repo.alias.clone());

        self.command.run(Privilege::Required, args).await?;
        Ok(())
    }

    async fn modify_repo(&self, repo: &Repository) -> Result<(), BackendError> {
        let mut args = vec!["modifyrepo".to_string()];
        args.extend(Self::editable_flags(repo));
        args.push(repo.index.to_string());

        self.command.run(Privilege::Required, args).await?;
        Ok(())
    }

    async fn delete_repo(&self, repo: &Repository) -> Result<(), BackendError> {
        let args = vec![
            "--xmlout".to_string(),
            "removerepo".to_string(),
            repo.index.to_string(),
        ];

        self.command.run(Privilege::Required, args).await?;
        Ok(())
    }

    fn refresh_repos(&self, repo: Option<&Repository>, import_keys: bool) -> RefreshHandle {
        let mut args = vec!["--xmlout".to_string()];
        if import_keys {
            args.push("--gpg-auto-import-keys".to_string());
        }
        args.push("refresh".to_string());
        args.push("-f".to_string());
        // No repository given means zypper refreshes all of them.
        if let Some(repo) = repo {
            args.push("-r".to_string());
            args.push(repo.index.to_string());
        }

        self.command.spawn_cancellable(Privilege::Required, args)
    }

    fn parse_error(&self, diagnostic: &str) -> RefreshError {
        classifier::classify(diagnostic)
    }

    fn error_message(&self, error: &RefreshError) -> ErrorMessage {
        match error {
            RefreshError::Untrusted { repos } => ErrorMessage {
                summary: "Couldn't trust the following repositories:".to_string(),
                repos: repos.clone(),
                detail: None,
                hint: Some(
                    "You can trust them, or run \"zypper ref\" as root in a console \
                     to see more information about the issue"
                        .to_string(),
                ),
            },
            RefreshError::Invalid { reason, repos } => ErrorMessage {
                summary: "Couldn't refresh the following repositories:".to_string(),
                repos: repos.clone(),
                detail: Some(reason.clone()),
                hint: None,
            },
            RefreshError::Locked { message } => ErrorMessage {
                summary: message.clone(),
                repos: Vec::new(),
                detail: None,
                hint: None,
            },
            RefreshError::Unknown => ErrorMessage {
                summary: "Unknown error occurred.".to_string(),
                repos: Vec::new(),
                detail: None,
                hint: Some("See \"zypper ref\" for more information.".to_string()),
            },
        }
    }
}
