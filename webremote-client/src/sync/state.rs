//! Playback state owned by the sync engine
//!
//! The engine is the only writer. Everything else receives `&PlaybackState`
//! or a [`crate::DisplayModel`] and can only read.

/// Identifier of the track the engine is currently following
///
/// Bumped every time the player reports a track id. A media element or
/// readiness notification tagged with an older epoch is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TrackEpoch(u64);

impl TrackEpoch {
    /// The epoch following this one
    pub fn next(self) -> Self {
        TrackEpoch(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TrackEpoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "epoch {}", self.0)
    }
}

/// Position and synchronization flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    /// Last position received from the player (ms)
    pub authoritative_position_ms: u64,
    /// Position shown to the user, extrapolated between player updates (ms)
    pub display_position_ms: u64,
    /// A user seek was sent and the player has not confirmed a position yet
    pub is_seeking: bool,
    pub is_playing: bool,
    /// A local media element exists
    pub is_streaming: bool,
    /// The local media element's position is stale
    pub needs_resync: bool,
    pub track_epoch: TrackEpoch,
}

/// Album art state of the current track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumArt {
    /// Signed URL of the track's art
    Image(String),
    /// The player has no art for this track
    Missing,
}

/// Descriptive fields of the current track, reflected as received
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<u64>,
    /// None until the player says anything about art
    pub album_art: Option<AlbumArt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_advances() {
        let first = TrackEpoch::default();
        let second = first.next();
        assert_ne!(first, second);
        assert!(second > first);
        assert_eq!(second.value(), 1);
    }

    #[test]
    fn test_default_state_is_idle() {
        let state = PlaybackState::default();
        assert_eq!(state.display_position_ms, 0);
        assert!(!state.is_seeking);
        assert!(!state.is_playing);
        assert!(!state.is_streaming);
        assert!(!state.needs_resync);
    }
}
