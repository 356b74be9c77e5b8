//! Broadcast hub: the set of live channels and fan-out to all of them.
//!
//! Each channel is represented by the sending half of a bounded queue that
//! its connection task drains into the WebSocket. A push copies the current
//! set, releases the lock, and sends to every copy concurrently. Channels
//! whose queue is closed or stays full past the send timeout are removed
//! once the whole push has been attempted.

use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use lanes_common::RESET_ACKNOWLEDGED;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info};

use crate::scores::{ScoreSnapshot, ScoreTable};

/// Identifier of one registered channel. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch-{}", self.0)
    }
}

/// A message queued for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Scores { revision: u64, json: Arc<str> },
    ResetAcknowledged,
}

impl Outbound {
    pub fn from_snapshot(snapshot: &ScoreSnapshot) -> Self {
        Outbound::Scores {
            revision: snapshot.revision,
            json: snapshot.to_json().into(),
        }
    }

    /// Text frame payload.
    pub fn text(&self) -> &str {
        match self {
            Outbound::Scores { json, .. } => &json[..],
            Outbound::ResetAcknowledged => RESET_ACKNOWLEDGED,
        }
    }
}

/// Outcome of one push.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushReport {
    /// Channels live when the push started.
    pub attempted: usize,
    pub delivered: usize,
    /// Channels removed because their send failed or stalled.
    pub dropped: usize,
}

struct ChannelHandle {
    tx: mpsc::Sender<Outbound>,
    peer: SocketAddr,
}

struct HubInner {
    scores: Arc<ScoreTable>,
    channels: RwLock<HashMap<ChannelId, ChannelHandle>>,
    next_id: AtomicU64,
    send_timeout: Duration,
    channel_buffer: usize,
}

/// Cheaply cloneable handle to the shared channel set.
#[derive(Clone)]
pub struct BroadcastHub {
    inner: Arc<HubInner>,
}

impl BroadcastHub {
    pub fn new(scores: Arc<ScoreTable>, send_timeout: Duration, channel_buffer: usize) -> Self {
        Self {
            inner: Arc::new(HubInner {
                scores,
                channels: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                send_timeout,
                channel_buffer: channel_buffer.max(1),
            }),
        }
    }

    pub fn scores(&self) -> &Arc<ScoreTable> {
        &self.inner.scores
    }

    /// Add a channel. The returned receiver yields everything pushed to it
    /// until the channel is unregistered or dropped by a failed send.
    pub async fn register(&self, peer: SocketAddr) -> (ChannelId, mpsc::Receiver<Outbound>) {
        let id = ChannelId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.inner.channel_buffer);

        let count = {
            let mut channels = self.inner.channels.write().await;
            channels.insert(id, ChannelHandle { tx, peer });
            channels.len()
        };
        info!(channel = %id, peer = %peer, channels = count, "Channel registered");
        (id, rx)
    }

    /// Remove a channel. Returns false if it was already gone.
    pub async fn unregister(&self, id: ChannelId) -> bool {
        let removed = self.inner.channels.write().await.remove(&id);
        match removed {
            Some(handle) => {
                info!(channel = %id, peer = %handle.peer, "Channel unregistered");
                true
            }
            None => false,
        }
    }

    pub async fn contains(&self, id: ChannelId) -> bool {
        self.inner.channels.read().await.contains_key(&id)
    }

    /// Number of live channels.
    pub async fn len(&self) -> usize {
        self.inner.channels.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Send the current score table to every live channel.
    pub async fn push_scores(&self) -> PushReport {
        let snapshot = self.inner.scores.snapshot().await;
        let report = self.fan_out(Outbound::from_snapshot(&snapshot)).await;
        debug!(
            revision = snapshot.revision,
            attempted = report.attempted,
            dropped = report.dropped,
            "Pushed scores"
        );
        report
    }

    /// Send the reset acknowledgment to every live channel.
    pub async fn push_reset(&self) -> PushReport {
        let report = self.fan_out(Outbound::ResetAcknowledged).await;
        info!(
            attempted = report.attempted,
            dropped = report.dropped,
            "Pushed reset acknowledgment"
        );
        report
    }

    /// Queue the current score table for one channel only.
    pub async fn push_scores_to(&self, id: ChannelId) -> bool {
        let tx = match self.inner.channels.read().await.get(&id) {
            Some(handle) => handle.tx.clone(),
            None => return false,
        };
        let snapshot = self.inner.scores.snapshot().await;
        if self.send_bounded(&tx, Outbound::from_snapshot(&snapshot)).await {
            true
        } else {
            self.unregister(id).await;
            false
        }
    }

    /// Drop every channel. Their connection tasks see the queue close and
    /// shut the socket.
    pub async fn close_all(&self) -> usize {
        let mut channels = self.inner.channels.write().await;
        let count = channels.len();
        channels.clear();
        count
    }

    async fn fan_out(&self, message: Outbound) -> PushReport {
        let targets: Vec<(ChannelId, mpsc::Sender<Outbound>)> = {
            let channels = self.inner.channels.read().await;
            channels
                .iter()
                .map(|(id, handle)| (*id, handle.tx.clone()))
                .collect()
        };

        let sends = targets.iter().map(|(id, tx)| {
            let message = message.clone();
            async move { (*id, self.send_bounded(tx, message).await) }
        });
        let results = join_all(sends).await;

        let dead: Vec<ChannelId> = results
            .iter()
            .filter(|(_, delivered)| !delivered)
            .map(|(id, _)| *id)
            .collect();

        if !dead.is_empty() {
            let mut channels = self.inner.channels.write().await;
            for id in &dead {
                if let Some(handle) = channels.remove(id) {
                    info!(channel = %id, peer = %handle.peer, "Dropping unresponsive channel");
                }
            }
        }

        PushReport {
            attempted: targets.len(),
            delivered: targets.len() - dead.len(),
            dropped: dead.len(),
        }
    }

    async fn send_bounded(&self, tx: &mpsc::Sender<Outbound>, message: Outbound) -> bool {
        matches!(
            tokio::time::timeout(self.inner.send_timeout, tx.send(message)).await,
            Ok(Ok(()))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanes_common::PlayerId;

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    fn hub_with_buffer(buffer: usize) -> BroadcastHub {
        BroadcastHub::new(
            Arc::new(ScoreTable::new()),
            Duration::from_millis(50),
            buffer,
        )
    }

    #[tokio::test]
    async fn register_assigns_unique_ids() {
        let hub = hub_with_buffer(4);
        let (a, _rx_a) = hub.register(peer()).await;
        let (b, _rx_b) = hub.register(peer()).await;
        assert_ne!(a, b);
        assert_eq!(hub.len().await, 2);
    }

    #[tokio::test]
    async fn unregister_is_idempotent() {
        let hub = hub_with_buffer(4);
        let (id, _rx) = hub.register(peer()).await;
        assert!(hub.unregister(id).await);
        assert!(!hub.unregister(id).await);
        assert!(hub.is_empty().await);
    }

    #[tokio::test]
    async fn push_scores_reaches_every_channel() {
        let hub = hub_with_buffer(4);
        let (_a, mut rx_a) = hub.register(peer()).await;
        let (_b, mut rx_b) = hub.register(peer()).await;

        hub.scores().set(PlayerId::Player1, "7").await;
        let report = hub.push_scores().await;
        assert_eq!(
            report,
            PushReport {
                attempted: 2,
                delivered: 2,
                dropped: 0
            }
        );

        for rx in [&mut rx_a, &mut rx_b] {
            let message = rx.recv().await.unwrap();
            assert_eq!(message.text(), r#"{"player_1":"7","player_2":"0"}"#);
            assert!(matches!(message, Outbound::Scores { revision: 1, .. }));
        }
    }

    #[tokio::test]
    async fn push_reset_reaches_every_channel() {
        let hub = hub_with_buffer(4);
        let (_a, mut rx_a) = hub.register(peer()).await;
        let (_b, mut rx_b) = hub.register(peer()).await;

        hub.push_reset().await;
        assert_eq!(rx_a.recv().await.unwrap(), Outbound::ResetAcknowledged);
        assert_eq!(rx_b.recv().await.unwrap(), Outbound::ResetAcknowledged);
        assert_eq!(Outbound::ResetAcknowledged.text(), "reset_acknowledged");
    }

    #[tokio::test]
    async fn closed_channel_is_removed_after_push() {
        let hub = hub_with_buffer(4);
        let (_live, mut rx_live) = hub.register(peer()).await;
        let (gone, rx_gone) = hub.register(peer()).await;
        drop(rx_gone);

        let report = hub.push_reset().await;
        assert_eq!(report.attempted, 2);
        assert_eq!(report.dropped, 1);
        assert!(!hub.contains(gone).await);
        assert_eq!(rx_live.recv().await.unwrap(), Outbound::ResetAcknowledged);
    }

    #[tokio::test]
    async fn stalled_channel_is_removed_after_timeout() {
        let hub = hub_with_buffer(1);
        let (stalled, _rx_stalled) = hub.register(peer()).await;

        // First push fills the queue, second one times out.
        assert_eq!(hub.push_reset().await.dropped, 0);
        let report = hub.push_reset().await;
        assert_eq!(report.dropped, 1);
        assert!(!hub.contains(stalled).await);
    }

    #[tokio::test]
    async fn channel_registered_after_push_sees_nothing() {
        let hub = hub_with_buffer(4);
        hub.push_reset().await;
        let (_late, mut rx_late) = hub.register(peer()).await;
        assert!(rx_late.try_recv().is_err());
    }

    #[tokio::test]
    async fn unregistered_channel_is_not_attempted() {
        let hub = hub_with_buffer(4);
        let (id, mut rx) = hub.register(peer()).await;
        hub.unregister(id).await;

        let report = hub.push_scores().await;
        assert_eq!(report.attempted, 0);
        // Sender dropped with the handle, so the queue is closed and empty.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn push_scores_to_targets_one_channel() {
        let hub = hub_with_buffer(4);
        let (a, mut rx_a) = hub.register(peer()).await;
        let (_b, mut rx_b) = hub.register(peer()).await;

        assert!(hub.push_scores_to(a).await);
        assert_eq!(
            rx_a.recv().await.unwrap().text(),
            r#"{"player_1":"0","player_2":"0"}"#
        );
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn close_all_empties_the_set() {
        let hub = hub_with_buffer(4);
        let (_a, mut rx_a) = hub.register(peer()).await;
        let (_b, _rx_b) = hub.register(peer()).await;

        assert_eq!(hub.close_all().await, 2);
        assert!(hub.is_empty().await);
        assert!(rx_a.recv().await.is_none());
    }
}
