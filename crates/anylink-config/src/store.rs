//! Credential file location.

use serde::{Deserialize, Serialize};

fn default_env_file() -> String {
    String::from(".env")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Path of the append-only `KEY=value` credential file.
    #[serde(default = "default_env_file")]
    pub env_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            env_file: default_env_file(),
        }
    }
}
