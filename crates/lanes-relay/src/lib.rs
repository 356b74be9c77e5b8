//! lanes_relay: score relay for the Lanes arcade game.
//!
//! Game processes report scores with one-shot TCP messages
//! (`"player_1:42"`); the relay keeps the latest score per player and pushes
//! the full table as JSON to every connected WebSocket channel (spectator
//! scoreboards, and game processes that want reset notifications). A
//! `"reset"` frame from any channel is fanned out as `"reset_acknowledged"`
//! to all of them.
//!
//! Module overview:
//! - `scores.rs`:  Score table, one entry per known player, revisioned.
//! - `hub.rs`:     Live channel set and concurrent fan-out with dead-channel
//!                 removal.
//! - `ingest.rs`:  TCP listener for score updates, one task per connection.
//! - `http.rs`:    Spectator port router: scoreboard page and channel upgrade.
//! - `channel.rs`: Per-channel task: queue → socket, `"reset"` → hub.
//! - `service/`:   Startup, bound addresses, shutdown.
//! - `client.rs`:  Ingest sender used by game processes and tests.

pub mod channel;
pub mod client;
pub mod hub;
pub mod ingest;
pub mod scores;
pub mod service;

mod http;

pub use hub::{BroadcastHub, ChannelId, Outbound, PushReport};
pub use scores::{ScoreSnapshot, ScoreTable};
pub use service::{RelayHandle, RelayService};
