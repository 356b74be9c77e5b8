//! Configuration schema types for the score relay.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod limits;
mod network;
mod system;

pub use limits::*;
pub use network::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration for the relay process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub network: NetworkConfig,
    pub limits: LimitsConfig,
    pub channels: ChannelsConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_network_matches_arcade_deployment() {
        let config = RelayConfig::default();
        assert_eq!(config.network.bind_address, "0.0.0.0");
        assert_eq!(config.network.ingest_port, 8080);
        assert_eq!(config.network.http_port, 8000);
        assert_eq!(config.network.channel_path, "/ws");
    }

    #[test]
    fn default_limits() {
        let config = RelayConfig::default();
        assert_eq!(config.limits.ingest_max_bytes, 1024);
        assert_eq!(
            config.limits.ingest_read_timeout(),
            Duration::from_millis(5000)
        );
        assert_eq!(config.limits.send_timeout(), Duration::from_millis(1000));
        assert_eq!(config.limits.channel_buffer, 32);
    }

    #[test]
    fn default_channels_do_not_push_on_connect() {
        let config = RelayConfig::default();
        assert!(!config.channels.push_snapshot_on_connect);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
[network]
ingest_port = 9100

[channels]
push_snapshot_on_connect = true
"#,
        )
        .unwrap();
        assert_eq!(config.network.ingest_port, 9100);
        assert_eq!(config.network.http_port, 8000);
        assert!(config.channels.push_snapshot_on_connect);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn log_level_parses_lowercase() {
        let config: RelayConfig = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.level.as_directive(), "debug");
    }

    #[test]
    fn addresses_join_bind_and_port() {
        let mut config = RelayConfig::default();
        config.network.bind_address = "127.0.0.1".into();
        assert_eq!(config.network.ingest_addr(), "127.0.0.1:8080");
        assert_eq!(config.network.http_addr(), "127.0.0.1:8000");
    }
}
