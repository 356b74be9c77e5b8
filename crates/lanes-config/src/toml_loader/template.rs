//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Lanes score relay configuration
# Only override what you want to change -- missing fields use defaults.

[network]
# bind_address = "0.0.0.0"
# ingest_port = 8080          # game processes send "player_1:42" here
# http_port = 8000            # scoreboard page and channel upgrade
# channel_path = "/ws"

[limits]
# ingest_max_bytes = 1024     # 16-65536
# ingest_read_timeout_ms = 5000   # 50-60000
# send_timeout_ms = 1000      # 50-30000
# channel_buffer = 32         # 1-4096

[channels]
# push_snapshot_on_connect = false

[logging]
# level = "info"              # trace, debug, info, warn, error
"##
    .to_string()
}
