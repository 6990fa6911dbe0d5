pub mod classifier;
pub mod command;
pub mod repository;

pub use command::{Privilege, ZypperCommand};
pub use repository::ZypperRepoRepository;
