//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use anylink_config::AnylinkConfig;
use anylink_core::enums::SelectionPolicy;
use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[discovery]
process_filter = "anytypeHelper"
host = "localhost"
port = 31007
policy = "most_recent"

[client]
app_name = "graph-miner"
timeout_secs = 30

[store]
env_file = "state/.env"

[search]
concurrency = 8
retry_attempts = 1
"#,
        )?;

        let figment = Figment::from(Serialized::defaults(AnylinkConfig::default()))
            .merge(Toml::file("config.toml"));
        let config = AnylinkConfig::from_figment(&figment).expect("config loads");

        assert_eq!(config.discovery.process_filter, "anytypeHelper");
        assert_eq!(config.discovery.host, "localhost");
        assert_eq!(config.discovery.port, Some(31007));
        assert_eq!(config.discovery.policy, SelectionPolicy::MostRecent);
        assert_eq!(config.client.app_name, "graph-miner");
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.store.env_file, "state/.env");
        assert_eq!(config.search.concurrency, 8);
        assert_eq!(config.search.retry_attempts, 1);
        assert_eq!(config.search.retry_base_delay_ms, 100);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults_for_missing_keys() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[client]
app_name = "only-this"
"#,
        )?;

        let figment = Figment::from(Serialized::defaults(AnylinkConfig::default()))
            .merge(Toml::file("config.toml"));
        let config = AnylinkConfig::from_figment(&figment).expect("config loads");

        assert_eq!(config.client.app_name, "only-this");
        assert_eq!(config.client.timeout_secs, 10);
        assert_eq!(config.discovery.process_filter, "anytype");
        assert!(config.discovery.port.is_none());
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[discovery]
process_filter = "from-toml"
"#,
        )?;
        jail.set_env("ANYLINK_DISCOVERY__PROCESS_FILTER", "from-env");

        let figment = Figment::from(Serialized::defaults(AnylinkConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("ANYLINK_").split("__"));
        let config = AnylinkConfig::from_figment(&figment).expect("config loads");

        assert_eq!(config.discovery.process_filter, "from-env");
        Ok(())
    });
}

#[test]
fn invalid_toml_value_is_rejected_by_validation() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[search]
concurrency = 0
"#,
        )?;

        let figment = Figment::from(Serialized::defaults(AnylinkConfig::default()))
            .merge(Toml::file("config.toml"));
        let err = AnylinkConfig::from_figment(&figment).unwrap_err();
        assert!(err.to_string().contains("search.concurrency"));
        Ok(())
    });
}
