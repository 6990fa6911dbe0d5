pub mod config;
pub mod refresh_error;
pub mod repository;

pub use config::{DEFAULT_POLL_INTERVAL_SECS, PanelConfig};
pub use refresh_error::{ErrorMessage, RefreshError};
pub use repository::Repository;
