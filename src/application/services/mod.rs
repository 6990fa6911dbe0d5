pub mod change_watcher;

pub use change_watcher::{ChangeWatcher, DEFAULT_POLL_INTERVAL};
