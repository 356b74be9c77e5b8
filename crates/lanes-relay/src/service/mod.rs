//! Relay service lifecycle.
//!
//! [`RelayService`] owns the score table and broadcast hub for the life of
//! the process and hands clones of them to the two listeners. Nothing is
//! global: tests start as many independent relays as they like on ephemeral
//! ports.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use lanes_common::RelayError;
use lanes_config::{validation, RelayConfig};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use crate::channel::ChannelContext;
use crate::http::{build_router, run_http_listener};
use crate::hub::BroadcastHub;
use crate::ingest::{run_ingest_listener, IngestLimits};
use crate::scores::ScoreTable;


/// How long [`RelayHandle::shutdown`] waits for connection tasks.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Shared state of one relay process, built once at startup.
pub struct RelayService {
    config: RelayConfig,
    hub: BroadcastHub,
}

impl RelayService {
    /// The config is used as given; run `lanes_config::validation::validate`
    /// first when it comes from a file.
    pub fn new(config: RelayConfig) -> Self {
        let scores = Arc::new(ScoreTable::new());
        let hub = BroadcastHub::new(
            scores,
            config.limits.send_timeout(),
            config.limits.channel_buffer as usize,
        );
        Self { config, hub }
    }

    pub fn hub(&self) -> &BroadcastHub {
        &self.hub
    }

    /// Bind both listeners and start serving. Apart from a channel path the
    /// router cannot mount, failing to bind either port is the only startup
    /// error.
    pub async fn start(self) -> Result<RelayHandle, RelayError> {
        let network = &self.config.network;
        validation::validate_channel_path(&network.channel_path)?;

        let ingest_listener = bind(&network.ingest_addr()).await?;
        let http_listener = bind(&network.http_addr()).await?;
        let ingest_addr = ingest_listener.local_addr()?;
        let http_addr = http_listener.local_addr()?;

        let shutdown = CancellationToken::new();
        let tracker = TaskTracker::new();

        let limits = IngestLimits {
            max_bytes: self.config.limits.ingest_max_bytes as usize,
            read_timeout: self.config.limits.ingest_read_timeout(),
        };
        let ingest_task = tokio::spawn(run_ingest_listener(
            ingest_listener,
            self.hub.clone(),
            limits,
            tracker.clone(),
            shutdown.clone(),
        ));

        let ctx = ChannelContext {
            hub: self.hub.clone(),
            send_timeout: self.config.limits.send_timeout(),
            push_on_connect: self.config.channels.push_snapshot_on_connect,
            shutdown: shutdown.clone(),
            tracker: tracker.clone(),
        };
        let router = build_router(&network.channel_path, ctx);
        let http_task = tokio::spawn(run_http_listener(http_listener, router, shutdown.clone()));

        info!(ingest = %ingest_addr, http = %http_addr, channel_path = %network.channel_path, "Relay started");

        Ok(RelayHandle {
            ingest_addr,
            http_addr,
            hub: self.hub,
            shutdown,
            tracker,
            listeners: vec![ingest_task, http_task],
        })
    }
}

async fn bind(addr: &str) -> Result<TcpListener, RelayError> {
    let resolved = tokio::net::lookup_host(addr)
        .await
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| RelayError::Address(addr.to_string()))?;

    TcpListener::bind(resolved)
        .await
        .map_err(|source| RelayError::Bind {
            addr: resolved,
            source,
        })
}

/// A running relay.
pub struct RelayHandle {
    ingest_addr: SocketAddr,
    http_addr: SocketAddr,
    hub: BroadcastHub,
    shutdown: CancellationToken,
    tracker: TaskTracker,
    listeners: Vec<JoinHandle<()>>,
}

impl RelayHandle {
    pub fn ingest_addr(&self) -> SocketAddr {
        self.ingest_addr
    }

    pub fn http_addr(&self) -> SocketAddr {
        self.http_addr
    }

    pub fn hub(&self) -> &BroadcastHub {
        &self.hub
    }

    pub fn scores(&self) -> &Arc<ScoreTable> {
        self.hub.scores()
    }

    /// Stop accepting, close every channel, and give in-flight connections a
    /// short grace period. Pending sends are not drained.
    pub async fn shutdown(self) {
        info!("Shutting down relay");
        self.shutdown.cancel();

        for mut listener in self.listeners {
            match tokio::time::timeout(SHUTDOWN_GRACE, &mut listener).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Listener task failed"),
                Err(_) => {
                    warn!("Listener did not stop within grace period");
                    listener.abort();
                }
            }
        }

        self.tracker.close();
        if tokio::time::timeout(SHUTDOWN_GRACE, self.tracker.wait())
            .await
            .is_err()
        {
            warn!(
                remaining = self.tracker.len(),
                "Connections still open after grace period"
            );
        }

        let dropped = self.hub.close_all().await;
        if dropped > 0 {
            warn!(channels = dropped, "Dropped channels left after shutdown");
        }
        info!("Relay stopped");
    }
}
