//! Control channel driver
//!
//! Connects to the player's signed WebSocket, feeds the [`SyncEngine`] from
//! one `select!` loop and carries out the commands it returns.
//!
//! Event sources:
//! - Text frames from the player (sparse snapshots and acknowledgements)
//! - The local ticker, armed only between `StartTicker` and `StopTicker`
//! - Readiness notifications from the local media element
//! - User commands

pub mod commands;
pub mod headless;

pub use commands::{parse_command, UserCommand};
pub use headless::{HeadlessElement, HeadlessFactory};

use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};
use webremote_common::api::Signer;
use webremote_common::config::ClientConfig;
use webremote_common::protocol::{Snapshot, PLAYER_CHANNEL_PATH};
use webremote_common::time;

use crate::display::DisplayModel;
use crate::sync::{Command, SyncEngine, SyncEvent};
use crate::Result;

/// Remote control session against one player
pub struct RemoteClient {
    config: ClientConfig,
    signer: Signer,
}

impl RemoteClient {
    pub fn new(config: ClientConfig) -> Self {
        let signer = Signer::new(&config.access_key);
        Self { config, signer }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Signed control channel URL for timestamp `ts`
    ///
    /// The player expects the signature after a `:` rather than a `?`.
    pub fn channel_url_at(&self, ts: i64) -> String {
        let signature = self.signer.sign_at(PLAYER_CHANNEL_PATH, ts);
        format!(
            "ws://{}{}:{}",
            self.config.authority(),
            PLAYER_CHANNEL_PATH,
            signature.query()
        )
    }

    /// Run until the player closes the channel or the user quits
    ///
    /// Returns the last display state.
    pub async fn run(&self, mut commands: mpsc::UnboundedReceiver<UserCommand>) -> Result<DisplayModel> {
        if !self.signer.has_key() {
            warn!("No access key configured; the player will likely reject requests");
        }

        info!("Connecting to {}", self.config.authority());
        let url = self.channel_url_at(time::now_ms());
        let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
        let (mut ws_tx, mut ws_rx) = ws_stream.split();

        let (ready_tx, mut ready_rx) = mpsc::unbounded_channel();
        let base_url = format!("http://{}", self.config.authority());
        let mut engine = SyncEngine::new(self.signer.clone(), HeadlessFactory::new(base_url, ready_tx));
        let period = Duration::from_millis(self.config.tick_interval_ms);
        let mut ticker: Option<Interval> = None;
        let mut shown = engine.display();

        let mut pending = engine.dispatch(SyncEvent::Connected, time::now_ms());
        if self.config.stream_on_connect {
            pending.extend(engine.dispatch(SyncEvent::ToggleStream, time::now_ms()));
        }
        execute(pending, &mut ws_tx, &mut ticker, period).await?;

        loop {
            let event = tokio::select! {
                message = ws_rx.next() => match message {
                    Some(Ok(Message::Text(text))) => match Snapshot::parse(&text) {
                        Ok(snapshot) => SyncEvent::Snapshot(snapshot),
                        Err(e) => {
                            warn!("Dropping malformed message from player: {}", e);
                            continue;
                        }
                    },
                    Some(Ok(Message::Close(frame))) => {
                        info!("Player closed the channel: {:?}", frame);
                        break;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        info!("Control channel ended");
                        break;
                    }
                },
                _ = next_tick(&mut ticker) => SyncEvent::Tick,
                Some(epoch) = ready_rx.recv() => SyncEvent::MediaReady { epoch },
                command = commands.recv() => match command {
                    Some(UserCommand::Event(event)) => event,
                    Some(UserCommand::Quit) | None => {
                        info!("Closing control channel");
                        if let Err(e) = ws_tx.close().await {
                            debug!("Close handshake failed: {}", e);
                        }
                        break;
                    }
                },
            };

            let pending = engine.dispatch(event, time::now_ms());
            execute(pending, &mut ws_tx, &mut ticker, period).await?;
            report(&mut shown, engine.display());
        }

        // Channel is gone; only the ticker needs stopping
        for command in engine.dispatch(SyncEvent::Disconnected, time::now_ms()) {
            if command == Command::StopTicker {
                ticker = None;
            }
        }
        drop(ticker);

        let final_display = engine.display();
        info!("{}", final_display.summary());
        Ok(final_display)
    }
}

/// Carry out engine commands in order
async fn execute<S>(
    commands: Vec<Command>,
    ws_tx: &mut S,
    ticker: &mut Option<Interval>,
    period: Duration,
) -> Result<()>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    for command in commands {
        match command {
            Command::Send(action) => {
                let text = action.to_json()?;
                debug!("-> {}", text);
                ws_tx.send(Message::Text(text)).await?;
            }
            Command::StartTicker => {
                let mut interval = interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                *ticker = Some(interval);
            }
            Command::StopTicker => *ticker = None,
        }
    }
    Ok(())
}

/// Next tick of the ticker, or never when it is stopped
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Log what changed on screen since the last report
fn report(shown: &mut DisplayModel, current: DisplayModel) {
    if *shown == current {
        return;
    }
    let headline_changed = shown.connected != current.connected
        || shown.playing != current.playing
        || shown.streaming != current.streaming
        || shown.title != current.title
        || shown.artist != current.artist
        || shown.hostname != current.hostname
        || shown.album_art != current.album_art;

    if headline_changed {
        info!("{}", current.summary());
        if let Some(art) = current.album_art_url() {
            debug!("Album art: {}", art);
        }
    } else {
        debug!("{}", current.summary());
    }
    *shown = current;
}
