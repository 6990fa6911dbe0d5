pub mod repo_repository;

pub use repo_repository::{RefreshHandle, RepoRepository};
