//! Spectator port router.
//!
//! Serves the scoreboard page at `/` and upgrades `GET <channel_path>` to a
//! channel. Everything else gets axum's default rejection.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{FromRef, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::channel::{self, ChannelContext};

const SCOREBOARD_HTML: &str = include_str!("../assets/scoreboard.html");

/// Placeholder in the page replaced with the configured channel path.
const CHANNEL_PATH_PLACEHOLDER: &str = "{{CHANNEL_PATH}}";

#[derive(Clone)]
pub(crate) struct SpectatorState {
    channels: ChannelContext,
    page: Arc<str>,
}

impl FromRef<SpectatorState> for ChannelContext {
    fn from_ref(state: &SpectatorState) -> Self {
        state.channels.clone()
    }
}

/// Build the spectator router. `channel_path` must already be a valid
/// literal path other than `/` and `/index.html`.
pub(crate) fn build_router(channel_path: &str, channels: ChannelContext) -> Router {
    let state = SpectatorState {
        channels,
        page: scoreboard_page(channel_path).into(),
    };

    Router::new()
        .route("/", get(scoreboard))
        .route("/index.html", get(scoreboard))
        .route(channel_path, get(channel::upgrade))
        .with_state(state)
}

/// Serve `router` until `shutdown` fires.
pub(crate) async fn run_http_listener(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) {
    let served = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.cancelled_owned())
    .await;

    if let Err(e) = served {
        warn!(error = %e, "HTTP server error");
    }
    info!("HTTP listener stopped");
}

async fn scoreboard(State(state): State<SpectatorState>) -> Html<String> {
    Html(state.page.to_string())
}

/// The spectator page wired to `channel_path`.
pub(crate) fn scoreboard_page(channel_path: &str) -> String {
    SCOREBOARD_HTML.replace(CHANNEL_PATH_PLACEHOLDER, channel_path)
}
