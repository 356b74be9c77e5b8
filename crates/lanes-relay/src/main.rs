//! lanes-relay: score relay between game processes and spectator screens.
//!
//! Accepts one-shot TCP score updates and pushes the full score table to
//! every connected WebSocket channel. See the library docs for the module
//! layout.

mod cli;

use std::process::ExitCode;

use std::path::PathBuf;

use lanes_config::{config_to_json, load_config, toml_loader, validation, RelayConfig};
use lanes_relay::client::send_score;
use lanes_relay::RelayService;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    // Writing a fresh file must work even when the existing one is broken.
    if let Some(Command::InitConfig { ref path }) = args.command {
        init_logging(&args, &RelayConfig::default());
        return init_config(path.clone());
    }

    // Config is read before logging is up so the file can set the level.
    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    args.apply_overrides(&mut config);

    init_logging(&args, &config);

    match args.command {
        None | Some(Command::Serve) => serve(config).await,
        Some(Command::Send {
            ref addr,
            player,
            ref score,
        }) => match send_score(addr.as_str(), player, score).await {
            Ok(()) => {
                tracing::info!(addr = %addr, player = %player, score = %score, "Score sent");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(addr = %addr, error = %e, "Failed to send score");
                ExitCode::FAILURE
            }
        },
        // Handled before the config is loaded.
        Some(Command::InitConfig { .. }) => ExitCode::SUCCESS,
        Some(Command::PrintConfig) => {
            println!("{}", config_to_json(&config));
            ExitCode::SUCCESS
        }
    }
}

/// `RUST_LOG` wins, then `--log-level`, then the config file.
fn init_logging(args: &Args, config: &RelayConfig) {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(config.logging.level.as_directive());
    let fallback = format!("lanes_relay={level},lanes_config={level}");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&fallback))
                .unwrap_or_else(|_| EnvFilter::new("lanes_relay=info,lanes_config=info")),
        )
        .init();
}

fn init_config(path: Option<PathBuf>) -> ExitCode {
    let path = match path {
        Some(path) => path,
        None => match toml_loader::default_config_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
    };
    match toml_loader::create_default_config(&path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Wrote default config");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: RelayConfig) -> ExitCode {
    // Command-line overrides are applied after the file was validated.
    if let Err(e) = validation::validate(&config) {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }

    tracing::info!("lanes-relay v{} starting...", env!("CARGO_PKG_VERSION"));

    let handle = match RelayService::new(config).start().await {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!("Failed to start relay: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        ingest = %handle.ingest_addr(),
        http = %handle.http_addr(),
        "Relay listening, press Ctrl+C to stop"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
    }

    handle.shutdown().await;
    ExitCode::SUCCESS
}
