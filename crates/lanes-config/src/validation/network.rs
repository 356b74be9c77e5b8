//! Listener address, port and channel path validation.

use std::net::IpAddr;

use crate::schema::RelayConfig;

/// Validate all network-related constraints.
pub(crate) fn validate_network(errors: &mut Vec<String>, config: &RelayConfig) {
    let network = &config.network;

    if network.bind_address != "localhost" && network.bind_address.parse::<IpAddr>().is_err() {
        errors.push(format!(
            "network.bind_address = {:?} is not an IP address",
            network.bind_address
        ));
    }

    if network.ingest_port == 0 {
        errors.push("network.ingest_port = 0 is not a usable port".into());
    }
    if network.http_port == 0 {
        errors.push("network.http_port = 0 is not a usable port".into());
    }
    if network.ingest_port != 0 && network.ingest_port == network.http_port {
        errors.push(format!(
            "network.ingest_port and network.http_port are both {}",
            network.ingest_port
        ));
    }

    validate_channel_path(errors, &network.channel_path);
}

pub(crate) fn validate_channel_path(errors: &mut Vec<String>, path: &str) {
    if !path.starts_with('/') {
        errors.push(format!("network.channel_path = {path:?} must start with '/'"));
    } else if path == "/" || path == "/index.html" {
        errors.push(format!(
            "network.channel_path = {path:?} collides with the scoreboard page"
        ));
    }

    if path.chars().any(|c| c.is_whitespace() || c == '?' || c == '#') {
        errors.push(format!(
            "network.channel_path = {path:?} must not contain whitespace, '?' or '#'"
        ));
    }

    // Route syntax characters would be read as captures or wildcards.
    if path.chars().any(|c| matches!(c, '{' | '}' | '*' | ':')) {
        errors.push(format!(
            "network.channel_path = {path:?} must be a literal path"
        ));
    }
}
