pub mod repo_operations;

pub use repo_operations::*;
