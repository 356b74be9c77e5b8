//! Timeout and buffer size validation.

use crate::schema::RelayConfig;

use super::helpers::validate_range;

/// Validate all limit-related constraints.
pub(crate) fn validate_limits(errors: &mut Vec<String>, config: &RelayConfig) {
    let limits = &config.limits;
    validate_range(
        errors,
        "limits.ingest_max_bytes",
        limits.ingest_max_bytes,
        16,
        65536,
    );
    validate_range(
        errors,
        "limits.ingest_read_timeout_ms",
        limits.ingest_read_timeout_ms,
        50,
        60_000,
    );
    validate_range(
        errors,
        "limits.send_timeout_ms",
        limits.send_timeout_ms,
        50,
        30_000,
    );
    validate_range(errors, "limits.channel_buffer", limits.channel_buffer, 1, 4096);
}
