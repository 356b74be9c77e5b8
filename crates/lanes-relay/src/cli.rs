use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lanes_common::PlayerId;
use lanes_config::RelayConfig;

/// Score relay for the Lanes arcade game.
#[derive(Parser, Debug)]
#[command(name = "lanes-relay", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Interface to listen on.
    #[arg(long)]
    pub bind: Option<String>,

    /// Port for score ingestion.
    #[arg(long)]
    pub ingest_port: Option<u16>,

    /// Port for the scoreboard page and channel upgrades.
    #[arg(long)]
    pub http_port: Option<u16>,

    /// URL path for channel upgrades.
    #[arg(long)]
    pub channel_path: Option<String>,

    /// Send current scores to each channel as soon as it opens.
    #[arg(long)]
    pub push_on_connect: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the relay (default).
    Serve,

    /// Send one score update to a running relay, as a game would.
    Send {
        /// Ingest address of the relay.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
        /// player_1 or player_2.
        player: PlayerId,
        score: String,
    },

    /// Write a commented default config file.
    InitConfig {
        /// Destination (defaults to the platform config path).
        path: Option<PathBuf>,
    },

    /// Print the effective config as JSON.
    PrintConfig,
}

impl Args {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut RelayConfig) {
        if let Some(ref bind) = self.bind {
            config.network.bind_address = bind.clone();
        }
        if let Some(port) = self.ingest_port {
            config.network.ingest_port = port;
        }
        if let Some(port) = self.http_port {
            config.network.http_port = port;
        }
        if let Some(ref path) = self.channel_path {
            config.network.channel_path = path.clone();
        }
        if self.push_on_connect {
            config.channels.push_snapshot_on_connect = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
