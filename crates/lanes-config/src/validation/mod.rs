//! Full configuration validation.
//!
//! Each section has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;
mod limits;
mod network;


use crate::schema::RelayConfig;
use lanes_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &RelayConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    network::validate_network(&mut errors, config);
    limits::validate_limits(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// Check a channel path on its own. The service runs this even when the
/// rest of the config was not validated, since the HTTP router cannot
/// mount an invalid path.
pub fn validate_channel_path(path: &str) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    network::validate_channel_path(&mut errors, path);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
