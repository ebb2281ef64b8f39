//! Sync engine - playback state machine
//!
//! **Responsibilities:**
//! - Apply sparse player snapshots to the owned [`PlaybackState`]
//! - Extrapolate the displayed position between snapshots on ticker ticks
//! - Hold the displayed position still while a user seek is in flight
//! - Create, resync and tear down the local media element
//!
//! All transitions go through [`SyncEngine::dispatch`] and run to completion.
//! Side effects that leave the engine (control-channel messages, ticker
//! start/stop) are returned as [`Command`]s for the driver to carry out.

use tracing::{debug, info, warn};
use webremote_common::api::Signer;
use webremote_common::protocol::{
    ControlAction, Snapshot, TransportAction, ART_PATH_PREFIX, STREAM_PATH,
};
use webremote_common::time;

use super::media::{can_seek_to, MediaElement, MediaFactory};
use super::state::{AlbumArt, PlaybackState, TrackEpoch, TrackInfo};
use crate::display::DisplayModel;

/// Input to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// Control channel opened
    Connected,
    /// Control channel closed
    Disconnected,
    /// Sparse state update from the player
    Snapshot(Snapshot),
    /// Local ticker fired
    Tick,
    /// User dragged the seek bar to `position_ms`
    Seek { position_ms: u64 },
    /// User pressed a transport button
    Transport(TransportAction),
    /// User asked for a full state refresh
    RefreshStatus,
    /// User toggled the local stream
    ToggleStream,
    /// Media element created for `epoch` can now seek
    MediaReady { epoch: TrackEpoch },
}

/// Side effect requested by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Send a request on the control channel
    Send(ControlAction),
    /// Start the periodic ticker
    StartTicker,
    /// Stop the periodic ticker
    StopTicker,
}

/// Running local clock
#[derive(Debug, Clone, Copy)]
struct Ticker {
    last_tick_ms: i64,
}

/// Media element plus the epoch it was created for
struct BoundMedia<E> {
    epoch: TrackEpoch,
    element: E,
}

/// Playback state machine
pub struct SyncEngine<F: MediaFactory> {
    signer: Signer,
    factory: F,
    state: PlaybackState,
    track: TrackInfo,
    connected: bool,
    hostname: Option<String>,
    /// At most one ticker exists
    ticker: Option<Ticker>,
    media: Option<BoundMedia<F::Element>>,
}

impl<F: MediaFactory> SyncEngine<F> {
    /// Create an idle, disconnected engine
    pub fn new(signer: Signer, factory: F) -> Self {
        Self {
            signer,
            factory,
            state: PlaybackState::default(),
            track: TrackInfo::default(),
            connected: false,
            hostname: None,
            ticker: None,
            media: None,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn track(&self) -> &TrackInfo {
        &self.track
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    /// True while the local ticker is running
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// The local media element, if streaming
    pub fn media(&self) -> Option<&F::Element> {
        self.media.as_ref().map(|m| &m.element)
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Display values derived from the current state
    pub fn display(&self) -> DisplayModel {
        DisplayModel::new(&self.state, &self.track, self.connected, self.hostname.as_deref())
    }

    /// Apply one event at wall-clock time `now_ms`
    pub fn dispatch(&mut self, event: SyncEvent, now_ms: i64) -> Vec<Command> {
        let mut commands = Vec::new();

        match event {
            SyncEvent::Connected => {
                info!("Control channel connected");
                self.connected = true;
                commands.push(Command::Send(ControlAction::Status));
            }
            SyncEvent::Disconnected => {
                info!("Control channel disconnected");
                self.connected = false;
                self.hostname = None;
                self.stop_ticker(&mut commands);
            }
            SyncEvent::Snapshot(snapshot) => self.apply_snapshot(snapshot, now_ms, &mut commands),
            SyncEvent::Tick => self.tick(now_ms),
            SyncEvent::Seek { position_ms } => self.request_seek(position_ms, &mut commands),
            SyncEvent::Transport(action) => {
                if self.connected {
                    commands.push(Command::Send(action.into()));
                } else {
                    warn!("Ignoring {} while disconnected", action);
                }
            }
            SyncEvent::RefreshStatus => {
                if self.connected {
                    commands.push(Command::Send(ControlAction::Status));
                }
            }
            SyncEvent::ToggleStream => {
                if self.state.is_streaming {
                    self.stop_streaming();
                } else {
                    self.start_streaming(now_ms);
                }
            }
            SyncEvent::MediaReady { epoch } => self.media_ready(epoch),
        }

        commands
    }

    // ========================================
    // Player snapshots
    // ========================================

    fn apply_snapshot(&mut self, snapshot: Snapshot, now_ms: i64, commands: &mut Vec<Command>) {
        if snapshot.is_ack_only() {
            debug!("Player replied: {}", snapshot.result.as_deref().unwrap_or_default());
            return;
        }

        if snapshot.shutdown.is_some() {
            info!("Player is shutting down");
            if self.state.is_streaming {
                self.stop_streaming();
            }
        }

        if let Some(hostname) = snapshot.hostname.as_ref() {
            self.hostname = Some(hostname.clone());
        }

        if let Some(id) = snapshot.id {
            self.state.display_position_ms = 0;
            self.state.authoritative_position_ms = 0;
            self.state.track_epoch = self.state.track_epoch.next();
            debug!("Track changed to entry {} ({})", id, self.state.track_epoch);

            if self.state.is_streaming {
                self.create_media(now_ms);
            }
        }

        if let Some(title) = snapshot.title.as_ref() {
            self.track.title = Some(title.clone());
        }
        if let Some(artist) = snapshot.artist.as_ref() {
            self.track.artist = Some(artist.clone());
        }
        if let Some(album) = snapshot.album.as_ref() {
            self.track.album = Some(album.clone());
        }
        if let Some(duration_ms) = snapshot.duration_ms() {
            self.track.duration_ms = Some(duration_ms);
        }

        if let Some(playing) = snapshot.playing {
            self.state.is_playing = playing;
            if playing {
                self.start_ticker(now_ms, commands);
                if let Some(media) = self.media.as_mut() {
                    media.element.play();
                }
            } else {
                self.stop_ticker(commands);
                if let Some(media) = self.media.as_mut() {
                    media.element.pause();
                }
            }
        }

        if let Some(position_ms) = snapshot.position_ms() {
            self.state.authoritative_position_ms = position_ms;
            self.state.display_position_ms = position_ms;
            if self.state.is_seeking {
                debug!("Seek confirmed at {}ms", position_ms);
            }
            self.state.is_seeking = false;

            if self.state.is_streaming {
                self.state.needs_resync = true;
                self.attempt_resync();
            }
        }

        if let Some(art) = snapshot.albumart.as_ref() {
            self.track.album_art = Some(match art {
                Some(name) => {
                    let path = format!("{}{}", ART_PATH_PREFIX, name);
                    AlbumArt::Image(self.signer.signed_path_at(&path, now_ms))
                }
                None => AlbumArt::Missing,
            });
        }

        if let Some(result) = snapshot.result.as_ref() {
            debug!("Player replied: {} (with state update)", result);
        }
    }

    // ========================================
    // Local clock
    // ========================================

    fn start_ticker(&mut self, now_ms: i64, commands: &mut Vec<Command>) {
        if self.ticker.is_none() {
            self.ticker = Some(Ticker { last_tick_ms: now_ms });
            commands.push(Command::StartTicker);
        }
    }

    fn stop_ticker(&mut self, commands: &mut Vec<Command>) {
        if self.ticker.take().is_some() {
            commands.push(Command::StopTicker);
        }
    }

    fn tick(&mut self, now_ms: i64) {
        let Some(ticker) = self.ticker.as_mut() else {
            return;
        };
        let elapsed = time::elapsed_ms(ticker.last_tick_ms, now_ms);
        ticker.last_tick_ms = now_ms;

        if !self.state.is_seeking {
            self.state.display_position_ms = self.state.display_position_ms.saturating_add(elapsed);
        }

        if self.state.is_streaming && self.state.needs_resync {
            self.attempt_resync();
        }
    }

    // ========================================
    // User actions
    // ========================================

    fn request_seek(&mut self, position_ms: u64, commands: &mut Vec<Command>) {
        if !self.connected {
            warn!("Ignoring seek while disconnected");
            return;
        }
        // One seek in flight; the bar stays put until the player answers
        if self.state.is_seeking {
            debug!("Seek to {}ms ignored, previous seek unconfirmed", position_ms);
            return;
        }
        self.state.is_seeking = true;
        commands.push(Command::Send(ControlAction::seek_to_ms(position_ms)));
    }

    // ========================================
    // Local stream
    // ========================================

    fn start_streaming(&mut self, now_ms: i64) {
        info!("Starting local stream");
        self.state.is_streaming = true;
        self.create_media(now_ms);
    }

    fn stop_streaming(&mut self) {
        info!("Stopping local stream");
        if let Some(mut media) = self.media.take() {
            media.element.pause();
        }
        self.state.is_streaming = false;
        self.state.needs_resync = false;
    }

    /// Replace the media element with a fresh one for the current epoch
    fn create_media(&mut self, now_ms: i64) {
        if let Some(mut old) = self.media.take() {
            old.element.pause();
        }
        let epoch = self.state.track_epoch;
        let url = self.signer.signed_path_at(STREAM_PATH, now_ms);
        debug!("Creating media element for {}", epoch);
        let element = self.factory.create(&url, epoch);
        self.media = Some(BoundMedia { epoch, element });
        self.state.needs_resync = true;
    }

    fn media_ready(&mut self, epoch: TrackEpoch) {
        match self.media.as_ref().map(|m| m.epoch) {
            Some(current) if current == epoch => self.attempt_resync(),
            Some(current) => debug!("Ignoring readiness for {} (current {})", epoch, current),
            None => debug!("Ignoring readiness for {}, not streaming", epoch),
        }
    }

    /// Move the media element to the synchronized position if it can get there
    ///
    /// Target is the displayed position: the player's last position
    /// extrapolated to now. Failure leaves `needs_resync` set for the next
    /// tick or readiness notification.
    fn attempt_resync(&mut self) {
        if !self.state.needs_resync {
            return;
        }
        let ticking = self.ticker.is_some();
        let Some(media) = self.media.as_mut() else {
            return;
        };

        let target = self.state.display_position_ms as f64 / 1000.0;
        if !can_seek_to(&media.element.seekable(), target) {
            debug!("Resync to {:.3}s pending, not seekable yet", target);
            return;
        }

        media.element.set_current_time(target);
        if ticking {
            media.element.play();
        }
        self.state.needs_resync = false;
        debug!("Local stream resynced to {:.3}s", target);
    }
}
