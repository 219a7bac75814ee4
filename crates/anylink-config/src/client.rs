//! RPC client configuration.

use serde::{Deserialize, Serialize};

fn default_app_name() -> String {
    String::from("anylink")
}

const fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Client-identifying name sent with a new challenge. Shown to the user
    /// in the application's approval dialog.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Connect and per-call timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub const fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
