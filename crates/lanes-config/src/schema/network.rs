use serde::{Deserialize, Serialize};

/// Listener configuration for the ingest port and the spectator HTTP port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Interface both listeners bind to.
    pub bind_address: String,
    /// TCP port game processes send `player_id:score` lines to.
    pub ingest_port: u16,
    /// Port serving the scoreboard page and the channel upgrade.
    pub http_port: u16,
    /// URL path of the persistent channel upgrade.
    pub channel_path: String,
}

impl NetworkConfig {
    pub fn ingest_addr(&self) -> String {
        join_host_port(&self.bind_address, self.ingest_port)
    }

    pub fn http_addr(&self) -> String {
        join_host_port(&self.bind_address, self.http_port)
    }
}

fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".into(),
            ingest_port: 8080,
            http_port: 8000,
            channel_path: "/ws".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv6_bind_is_bracketed() {
        let config = NetworkConfig {
            bind_address: "::1".into(),
            ..NetworkConfig::default()
        };
        assert_eq!(config.ingest_addr(), "[::1]:8080");
    }
}
