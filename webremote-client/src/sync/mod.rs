//! Playback position synchronization
//!
//! **Responsibilities:**
//! - Owned playback state (positions, seek/stream/resync flags, track epoch)
//! - Single transition function over [`SyncEvent`]
//! - Local media element seam and the resync policy

pub mod engine;
pub mod media;
pub mod state;

pub use engine::{Command, SyncEngine, SyncEvent};
pub use media::{can_seek_to, MediaElement, MediaFactory, TimeRange};
pub use state::{AlbumArt, PlaybackState, TrackEpoch, TrackInfo};
