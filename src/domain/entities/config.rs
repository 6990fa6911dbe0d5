use serde::{Deserialize, Serialize};

/// Poll period for change detection, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PanelConfig {
    pub poll_interval_secs: u64,
    /// Prefix mutating commands with `sudo -n` instead of assuming the
    /// process already runs with administrative privileges.
    pub use_sudo: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            use_sudo: false,
        }
    }
}
