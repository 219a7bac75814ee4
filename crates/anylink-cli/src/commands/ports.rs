use anylink_config::AnylinkConfig;
use anylink_core::entities::ListeningEndpoint;
use anylink_rpc::discovery::{self, SystemSocketTable};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::{Tabular, cell, output};

#[derive(Serialize)]
struct PortRow {
    port: u16,
    pid: u32,
    process: String,
    ordinal: Option<u64>,
    selected: bool,
}

#[derive(Serialize)]
struct PortsResponse {
    filter: String,
    policy: String,
    configured_port: Option<u16>,
    endpoints: Vec<PortRow>,
}

impl Tabular for PortsResponse {
    fn headers(&self) -> Vec<&'static str> {
        vec!["port", "pid", "process", "ordinal", "selected"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.endpoints
            .iter()
            .map(|row| {
                vec![
                    row.port.to_string(),
                    row.pid.to_string(),
                    row.process.clone(),
                    cell(row.ordinal.map(|o| o.to_string()).as_deref()),
                    row.selected.to_string(),
                ]
            })
            .collect()
    }
}

/// Handle `anylink ports`.
pub fn handle(config: &AnylinkConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let table = SystemSocketTable::new();
    let endpoints = discovery::locate(&table, &config.discovery.process_filter)?;
    output(&response(config, &endpoints), flags.format)
}

fn response(config: &AnylinkConfig, endpoints: &[ListeningEndpoint]) -> PortsResponse {
    let selected = match config.discovery.port {
        Some(port) => Some(port),
        None => discovery::select(endpoints, config.discovery.policy).map(|e| e.port),
    };

    PortsResponse {
        filter: config.discovery.process_filter.clone(),
        policy: config.discovery.policy.to_string(),
        configured_port: config.discovery.port,
        endpoints: endpoints
            .iter()
            .map(|endpoint| PortRow {
                port: endpoint.port,
                pid: endpoint.pid,
                process: endpoint.process_name.clone(),
                ordinal: endpoint.ordinal,
                selected: selected == Some(endpoint.port),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn endpoint(port: u16, ordinal: Option<u64>) -> ListeningEndpoint {
        ListeningEndpoint {
            pid: 42,
            process_name: "anytypeHelper".into(),
            port,
            ordinal,
        }
    }

    #[test]
    fn policy_selection_is_marked() {
        let config = AnylinkConfig::default();
        let response = response(&config, &[endpoint(31007, Some(2)), endpoint(31009, Some(9))]);

        let selected: Vec<(u16, bool)> = response.endpoints.iter().map(|r| (r.port, r.selected)).collect();
        assert_eq!(selected, vec![(31007, true), (31009, false)]);
        assert_eq!(response.policy, "lowest_port");
    }

    #[test]
    fn configured_port_wins_over_policy() {
        let mut config = AnylinkConfig::default();
        config.discovery.port = Some(31009);
        let response = response(&config, &[endpoint(31007, None), endpoint(31009, None)]);

        assert!(!response.endpoints[0].selected);
        assert!(response.endpoints[1].selected);
        assert_eq!(response.rows()[0][3], "-");
    }
}
