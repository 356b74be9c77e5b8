//! Persistent channel endpoint.
//!
//! A channel moves through `Connecting → Open → Closed`. It is registered
//! with the hub in the upgrade handler, before the `101 Switching Protocols`
//! response goes out, so a client whose handshake has completed is already
//! part of every later push. While open it forwards queued hub messages to
//! the socket and turns inbound `"reset"` frames into a hub-wide reset push.
//! Any read or write failure, a close frame, removal from the hub, or
//! service shutdown closes it and takes it out of the hub.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, State};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use lanes_common::ChannelMessage;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::hub::{BroadcastHub, ChannelId, Outbound};

/// Shared settings every channel task needs.
#[derive(Clone)]
pub(crate) struct ChannelContext {
    pub hub: BroadcastHub,
    pub send_timeout: Duration,
    pub push_on_connect: bool,
    pub shutdown: CancellationToken,
    /// Channel tasks and the reset pushes they start.
    pub tracker: TaskTracker,
}

/// Why an open channel closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    ClientClosed,
    ReadFailed,
    WriteFailed,
    /// The hub dropped the channel after a failed or stalled push.
    Removed,
    Shutdown,
}

/// `GET <channel_path>` upgrade handler.
pub(crate) async fn upgrade(
    State(ctx): State<ChannelContext>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> Response {
    // Connecting
    let (id, rx) = ctx.hub.register(peer).await;

    let hub = ctx.hub.clone();
    let tracker = ctx.tracker.clone();
    ws.on_failed_upgrade(move |e| {
        warn!(channel = %id, peer = %peer, error = %e, "Upgrade failed");
        tokio::spawn(async move {
            hub.unregister(id).await;
        });
    })
    .on_upgrade(move |socket| tracker.track_future(serve_channel(socket, id, rx, peer, ctx)))
}

async fn serve_channel(
    socket: WebSocket,
    id: ChannelId,
    rx: mpsc::Receiver<Outbound>,
    peer: SocketAddr,
    ctx: ChannelContext,
) {
    // Open
    if ctx.push_on_connect && !ctx.hub.push_scores_to(id).await {
        debug!(channel = %id, "Initial snapshot not queued");
    }

    let reason = run_open_channel(socket, id, rx, &ctx).await;

    // Closed
    ctx.hub.unregister(id).await;
    info!(channel = %id, peer = %peer, reason = ?reason, "Channel closed");
}

async fn run_open_channel(
    socket: WebSocket,
    id: ChannelId,
    mut rx: mpsc::Receiver<Outbound>,
    ctx: &ChannelContext,
) -> CloseReason {
    let (mut sink, mut stream) = socket.split();
    let mut last_revision: Option<u64> = None;

    loop {
        tokio::select! {
            biased;

            _ = ctx.shutdown.cancelled() => {
                let _ = tokio::time::timeout(ctx.send_timeout, sink.send(Message::Close(None))).await;
                return CloseReason::Shutdown;
            }

            outbound = rx.recv() => {
                let Some(outbound) = outbound else {
                    let _ = tokio::time::timeout(ctx.send_timeout, sink.send(Message::Close(None))).await;
                    return CloseReason::Removed;
                };

                if let Outbound::Scores { revision, .. } = &outbound {
                    // A later snapshot already went out; this one is stale.
                    if last_revision.is_some_and(|last| *revision <= last) {
                        continue;
                    }
                    last_revision = Some(*revision);
                }

                let frame = Message::Text(outbound.text().to_owned().into());
                match tokio::time::timeout(ctx.send_timeout, sink.send(frame)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        debug!(channel = %id, error = %e, "WS write error");
                        return CloseReason::WriteFailed;
                    }
                    Err(_) => {
                        warn!(channel = %id, "WS write timed out");
                        return CloseReason::WriteFailed;
                    }
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match ChannelMessage::parse(text.as_str()) {
                        ChannelMessage::ResetRequest => {
                            info!(channel = %id, "Reset requested");
                            // Pushed from its own task so this channel keeps
                            // draining its queue while the fan-out runs.
                            let hub = ctx.hub.clone();
                            ctx.tracker.spawn(async move {
                                hub.push_reset().await;
                            });
                        }
                        ChannelMessage::Unrecognized(_) => {
                            debug!(channel = %id, len = text.as_str().len(), "Ignoring channel message");
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => return CloseReason::ClientClosed,
                    Some(Err(e)) => {
                        debug!(channel = %id, error = %e, "WS read error");
                        return CloseReason::ReadFailed;
                    }
                    // Binary frames are ignored; pongs are queued by the socket.
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}
