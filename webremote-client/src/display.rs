//! Values presented to the user
//!
//! A [`DisplayModel`] is a read-only projection of the engine state. The
//! front end never sees [`PlaybackState`] directly.

use webremote_common::human_time::{format_track_position, format_track_time};

use crate::sync::{AlbumArt, PlaybackState, TrackInfo};

/// Transport button icon while playing
pub const PAUSE_ICON: &str = "/icon/media-playback-pause-symbolic/48";

/// Transport button icon while paused
pub const PLAY_ICON: &str = "/icon/media-playback-start-symbolic/48";

/// Shown in place of album art when the player has none
pub const NO_ART_ICON: &str = "/icon/org.gnome.Rhythmbox3-symbolic/128";

/// Snapshot of everything the remote shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayModel {
    pub position_ms: u64,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<u64>,
    pub album_art: Option<AlbumArt>,
    pub hostname: Option<String>,
    pub connected: bool,
    pub playing: bool,
    pub seeking: bool,
    pub streaming: bool,
}

impl DisplayModel {
    pub(crate) fn new(
        state: &PlaybackState,
        track: &TrackInfo,
        connected: bool,
        hostname: Option<&str>,
    ) -> Self {
        Self {
            position_ms: state.display_position_ms,
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            duration_ms: track.duration_ms,
            album_art: track.album_art.clone(),
            hostname: hostname.map(str::to_string),
            connected,
            playing: state.is_playing,
            seeking: state.is_seeking,
            streaming: state.is_streaming,
        }
    }

    /// Elapsed time, `mm:ss` or `hh:mm:ss`
    pub fn position_text(&self) -> String {
        format_track_position(self.position_ms)
    }

    /// Track length, empty until the player reports it
    pub fn duration_text(&self) -> String {
        self.duration_ms
            .map(|ms| format_track_time(ms as f64 / 1000.0))
            .unwrap_or_default()
    }

    /// Upper bound of the seek bar
    pub fn seek_max_ms(&self) -> u64 {
        self.duration_ms.unwrap_or(0)
    }

    /// `"title - artist"`, falling back to whichever part is known
    pub fn window_title(&self) -> String {
        match (self.title.as_deref(), self.artist.as_deref()) {
            (Some(title), Some(artist)) if !artist.is_empty() => {
                format!("{} - {}", title, artist)
            }
            (Some(title), _) => title.to_string(),
            (None, Some(artist)) => artist.to_string(),
            (None, None) => String::new(),
        }
    }

    pub fn play_pause_icon(&self) -> &'static str {
        if self.playing {
            PAUSE_ICON
        } else {
            PLAY_ICON
        }
    }

    /// Image to show for the album art slot
    pub fn album_art_url(&self) -> Option<&str> {
        match self.album_art.as_ref()? {
            AlbumArt::Image(url) => Some(url),
            AlbumArt::Missing => Some(NO_ART_ICON),
        }
    }

    /// One status line for logging
    pub fn summary(&self) -> String {
        let state = if !self.connected {
            "disconnected"
        } else if self.playing {
            "playing"
        } else {
            "paused"
        };
        let title = self.window_title();
        if title.is_empty() {
            format!("[{}] {}", state, self.position_text())
        } else {
            format!(
                "[{}] {} {}/{}",
                state,
                title,
                self.position_text(),
                self.duration_text()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_pause_icon() {
        let mut model = DisplayModel::default();
        assert_eq!(model.play_pause_icon(), PLAY_ICON);
        model.playing = true;
        assert_eq!(model.play_pause_icon(), PAUSE_ICON);
    }

    #[test]
    fn test_time_text() {
        let model = DisplayModel {
            position_ms: 65_400,
            duration_ms: Some(3_725_000),
            ..Default::default()
        };
        assert_eq!(model.position_text(), "01:05");
        assert_eq!(model.duration_text(), "01:02:05");
        assert_eq!(model.seek_max_ms(), 3_725_000);
    }

    #[test]
    fn test_unknown_duration() {
        let model = DisplayModel::default();
        assert_eq!(model.duration_text(), "");
        assert_eq!(model.seek_max_ms(), 0);
    }

    #[test]
    fn test_window_title() {
        let mut model = DisplayModel {
            title: Some("Song".to_string()),
            ..Default::default()
        };
        assert_eq!(model.window_title(), "Song");
        model.artist = Some("Band".to_string());
        assert_eq!(model.window_title(), "Song - Band");
        model.title = None;
        assert_eq!(model.window_title(), "Band");
    }

    #[test]
    fn test_album_art_url() {
        let mut model = DisplayModel::default();
        assert_eq!(model.album_art_url(), None);
        model.album_art = Some(AlbumArt::Missing);
        assert_eq!(model.album_art_url(), Some(NO_ART_ICON));
        model.album_art = Some(AlbumArt::Image("/art/x?sig=0&ts=1".to_string()));
        assert_eq!(model.album_art_url(), Some("/art/x?sig=0&ts=1"));
    }
}
