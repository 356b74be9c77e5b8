//! Score relay configuration.
//!
//! Provides TOML-based configuration with validation. All sections use
//! defaults matching the standard arcade deployment (ingest on 8080,
//! spectators on 8000 at `/ws`), so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lanes_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    ChannelsConfig, LimitsConfig, LogLevel, LoggingConfig, NetworkConfig, RelayConfig,
};

use std::path::Path;

use lanes_common::ConfigError;

/// Load and validate the relay config.
///
/// With `path`, the file must exist. Without it, the platform default
/// location is tried and built-in defaults are used when nothing is there.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &RelayConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
