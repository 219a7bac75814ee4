//! Local endpoint discovery configuration.

use anylink_core::enums::SelectionPolicy;
use serde::{Deserialize, Serialize};

fn default_process_filter() -> String {
    String::from("anytype")
}

fn default_host() -> String {
    String::from("127.0.0.1")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// Case-insensitive substring matched against owning process names.
    #[serde(default = "default_process_filter")]
    pub process_filter: String,

    /// Host the located port is dialled on.
    #[serde(default = "default_host")]
    pub host: String,

    /// Explicit port. Skips socket-table discovery when set.
    #[serde(default)]
    pub port: Option<u16>,

    /// Primary-port selection rule.
    #[serde(default)]
    pub policy: SelectionPolicy,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            process_filter: default_process_filter(),
            host: default_host(),
            port: None,
            policy: SelectionPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.process_filter, "anytype");
        assert_eq!(config.host, "127.0.0.1");
        assert!(config.port.is_none());
        assert_eq!(config.policy, SelectionPolicy::LowestPort);
    }
}
