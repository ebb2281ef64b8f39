//! # Web Remote Client Library (webremote-client)
//!
//! Remote control for a streaming media player.
//!
//! **Purpose:** Keep a live, server-synchronized view of the playback
//! position, forward user actions over the signed control channel, and keep
//! an optional local stream position-locked to the remote player.
//!
//! **Architecture:** A pure event-driven [`sync::SyncEngine`] owns all
//! playback state. The [`remote`] driver feeds it control-channel messages,
//! ticker ticks and user commands on a single tokio task and carries out the
//! commands it returns.

pub mod display;
pub mod error;
pub mod remote;
pub mod sync;

pub use display::DisplayModel;
pub use error::{Error, Result};
pub use sync::{Command, SyncEngine, SyncEvent};
