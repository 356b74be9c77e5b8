//! Per-connection limits and timeouts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest ingest message read from one connection (valid range: 16-65536).
    pub ingest_max_bytes: u32,
    /// How long an ingest connection may stay silent (valid range: 50-60000).
    pub ingest_read_timeout_ms: u32,
    /// How long a push may wait on one channel before it counts as gone
    /// (valid range: 50-30000).
    pub send_timeout_ms: u32,
    /// Outbound messages queued per channel (valid range: 1-4096).
    pub channel_buffer: u32,
}

impl LimitsConfig {
    pub fn ingest_read_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.ingest_read_timeout_ms))
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.send_timeout_ms))
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            ingest_max_bytes: 1024,
            ingest_read_timeout_ms: 5000,
            send_timeout_ms: 1000,
            channel_buffer: 32,
        }
    }
}
