use crate::domain::entities::Repository;

pub struct RepoValidator;

impl RepoValidator {
    pub fn validate_alias(alias: &str) -> bool {
        !alias.is_empty() && !alias.chars().any(|c| c.is_whitespace())
    }

    pub fn validate_repo(repo: &Repository) -> Result<(), String> {
        if !Self::validate_alias(&repo.alias) {
            return Err(format!("Invalid repository alias: {:?}", repo.alias));
        }
        if repo.name.is_empty() {
            return Err("Repository name must not be empty".to_string());
        }
        if repo.uri.is_empty() {
            return Err("Repository URI must not be empty".to_string());
        }
        // A listing can legitimately report priority 0 (missing attribute);
        // only negative values are nonsense.
        if repo.priority < 0 {
            return Err(format!("Invalid repository priority: {}", repo.priority));
        }
        Ok(())
    }
}
