pub mod config_repository;
pub mod zypper;

pub use config_repository::ConfigRepository;
