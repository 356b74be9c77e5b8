//! Core TOML config loading: read from path or platform default.

use crate::schema::RelayConfig;
use lanes_common::ConfigError;
use std::path::Path;
use tracing::info;

use super::paths::default_config_path;

/// Load config from a specific TOML file path.
///
/// Missing fields fall back to serde defaults. Validation is left to the
/// caller.
pub fn load_from_path(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let config: RelayConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/lanes/relay.toml`
/// On Linux: `~/.config/lanes/relay.toml`
///
/// If the file does not exist, returns defaults without touching the disk.
pub fn load_default() -> Result<RelayConfig, ConfigError> {
    let path = match default_config_path() {
        Ok(path) => path,
        Err(e) => {
            info!("{e}, using built-in defaults");
            return Ok(RelayConfig::default());
        }
    };

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, using built-in defaults", path.display());
            Ok(RelayConfig::default())
        }
        Err(e) => Err(e),
    }
}
