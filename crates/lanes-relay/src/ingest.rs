//! Ingest listener: one-shot TCP score updates from game processes.
//!
//! Each connection delivers a single `"<player_id>:<score>"` message. The
//! relay reads once, applies the update, closes the socket and never
//! answers. Delivery is best effort: a message lost to a reset connection,
//! a timeout or a malformed payload is simply dropped and the game's next
//! update supersedes it.

use std::net::SocketAddr;
use std::time::Duration;

use lanes_common::{IngestMessage, PlayerId, Unrecognized};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::hub::BroadcastHub;

/// Pause after a failed accept (e.g. out of file descriptors).
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Per-connection limits.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IngestLimits {
    pub max_bytes: usize,
    pub read_timeout: Duration,
}

/// What became of one ingest connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Updated { player: PlayerId, revision: u64 },
    Dropped(Unrecognized),
    Empty,
    InvalidUtf8,
    TimedOut,
    ReadFailed(String),
}

/// Accept connections until `shutdown` fires, one task per connection.
pub(crate) async fn run_ingest_listener(
    listener: TcpListener,
    hub: BroadcastHub,
    limits: IngestLimits,
    tracker: TaskTracker,
    shutdown: CancellationToken,
) {
    loop {
        let accepted = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => accepted,
        };

        match accepted {
            Ok((stream, peer)) => {
                let hub = hub.clone();
                tracker.spawn(async move {
                    let outcome = handle_ingest(stream, &hub, limits).await;
                    log_outcome(peer, &outcome);
                });
            }
            Err(e) => {
                warn!(error = %e, "Ingest accept error");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
    info!("Ingest listener stopped");
}

/// Read one message from `stream`, apply it, and push on success. The
/// stream is dropped (closing the connection) before the push.
pub(crate) async fn handle_ingest<S: AsyncRead + Unpin>(
    mut stream: S,
    hub: &BroadcastHub,
    limits: IngestLimits,
) -> IngestOutcome {
    let mut buf = vec![0u8; limits.max_bytes];
    let n = match tokio::time::timeout(limits.read_timeout, stream.read(&mut buf)).await {
        Ok(Ok(n)) => n,
        Ok(Err(e)) => return IngestOutcome::ReadFailed(e.to_string()),
        Err(_) => return IngestOutcome::TimedOut,
    };
    drop(stream);

    if n == 0 {
        return IngestOutcome::Empty;
    }
    let Ok(text) = std::str::from_utf8(&buf[..n]) else {
        return IngestOutcome::InvalidUtf8;
    };

    match IngestMessage::parse(text) {
        IngestMessage::ScoreUpdate { player, score } => {
            let revision = hub.scores().set(player, score).await;
            hub.push_scores().await;
            IngestOutcome::Updated { player, revision }
        }
        IngestMessage::Unrecognized(reason) => IngestOutcome::Dropped(reason),
    }
}

fn log_outcome(peer: SocketAddr, outcome: &IngestOutcome) {
    match outcome {
        IngestOutcome::Updated { player, revision } => {
            debug!(peer = %peer, player = %player, revision, "Score updated");
        }
        IngestOutcome::Dropped(reason) => {
            warn!(peer = %peer, reason = ?reason, "Dropped ingest message");
        }
        IngestOutcome::Empty => {
            debug!(peer = %peer, "Ingest connection closed without data");
        }
        IngestOutcome::InvalidUtf8 => {
            warn!(peer = %peer, "Dropped ingest message: not UTF-8");
        }
        IngestOutcome::TimedOut => {
            warn!(peer = %peer, "Ingest connection timed out");
        }
        IngestOutcome::ReadFailed(e) => {
            warn!(peer = %peer, error = %e, "Ingest read failed");
        }
    }
}
