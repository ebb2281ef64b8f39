//! Web remote (webremote) - Main entry point
//!
//! Terminal remote control for a streaming media player. Reads line
//! commands from stdin and logs what the remote would display.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webremote_client::remote::{parse_command, RemoteClient, UserCommand};
use webremote_common::config::{resolve_config, ConfigOverrides, ENV_ACCESS_KEY, ENV_HOST, ENV_PORT};

/// Command-line arguments for webremote
#[derive(Parser, Debug)]
#[command(name = "webremote")]
#[command(about = "Remote control for a streaming media player")]
#[command(version)]
struct Args {
    /// Config file (default: <config dir>/webremote/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Player host
    #[arg(long, env = ENV_HOST)]
    host: Option<String>,

    /// Player web remote port
    #[arg(short, long, env = ENV_PORT)]
    port: Option<u16>,

    /// Shared access key
    #[arg(short = 'k', long, env = ENV_ACCESS_KEY, hide_env_values = true)]
    access_key: Option<String>,

    /// Start the local stream once connected
    #[arg(long)]
    stream: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let overrides = ConfigOverrides {
        config_path: args.config.clone(),
        host: args.host.clone(),
        port: args.port,
        access_key: args.access_key.clone(),
    };
    let mut config = resolve_config(&overrides).context("Failed to load configuration")?;
    if args.stream {
        config.stream_on_connect = true;
    }

    // Initialize tracing; RUST_LOG wins over the configured level
    let level = config.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("webremote={level},webremote_client={level},webremote_common={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting web remote for {}", config.authority());

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match parse_command(&line) {
                    Ok(command) => {
                        if command_tx.send(command).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("{}", e),
                },
                Ok(None) => {
                    info!("End of input");
                    let _ = command_tx.send(UserCommand::Quit);
                    break;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    let _ = command_tx.send(UserCommand::Quit);
                    break;
                }
            }
        }
    });

    let client = RemoteClient::new(config);
    tokio::select! {
        result = client.run(command_rx) => {
            let last_display = result.context("Remote session failed")?;
            if last_display.title.is_some() {
                info!("Last track: {}", last_display.window_title());
            }
        }
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutdown complete");
    Ok(())
}
