//! Control-channel wire protocol
//!
//! JSON text messages in both directions over the player WebSocket.
//!
//! - Outbound: `{"action": ...}` requests ([`ControlAction`])
//! - Inbound: sparse state updates carrying only the fields that changed
//!   ([`Snapshot`]), plus `{"result": ...}` acknowledgements

use serde::{Deserialize, Deserializer, Serialize};

use crate::Result;

/// Path of the player control channel
pub const PLAYER_CHANNEL_PATH: &str = "/ws/player";

/// Path of the currently playing entry's audio stream
pub const STREAM_PATH: &str = "/entry/current/stream";

/// Prefix of album art paths
pub const ART_PATH_PREFIX: &str = "/art/";

// ========================================
// Outbound
// ========================================

/// Transport buttons on the remote
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportAction {
    Previous,
    PlayPause,
    Next,
}

impl std::fmt::Display for TransportAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportAction::Previous => write!(f, "previous"),
            TransportAction::PlayPause => write!(f, "playpause"),
            TransportAction::Next => write!(f, "next"),
        }
    }
}

/// Request sent to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ControlAction {
    /// Ask for a full state snapshot
    Status,
    Previous,
    PlayPause,
    Next,
    /// Seek the player to `time` seconds
    Seek { time: f64 },
}

impl From<TransportAction> for ControlAction {
    fn from(action: TransportAction) -> Self {
        match action {
            TransportAction::Previous => ControlAction::Previous,
            TransportAction::PlayPause => ControlAction::PlayPause,
            TransportAction::Next => ControlAction::Next,
        }
    }
}

impl ControlAction {
    /// Seek request for a millisecond position
    pub fn seek_to_ms(position_ms: u64) -> Self {
        ControlAction::Seek {
            time: position_ms as f64 / 1000.0,
        }
    }

    /// JSON text frame for this action
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ========================================
// Inbound
// ========================================

/// Sparse state update pushed by the player
///
/// Absent fields mean "unchanged". `albumart` distinguishes absent
/// (`None`) from an explicit `null` (`Some(None)`, the track has no art).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Snapshot {
    /// The player is going away
    pub shutdown: Option<bool>,
    pub hostname: Option<String>,
    /// Playing entry id; present whenever the playing track changed
    pub id: Option<u64>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Track duration in seconds
    pub duration: Option<f64>,
    pub playing: Option<bool>,
    /// Playback position in milliseconds
    pub position: Option<f64>,
    /// Album art file name under `/art/`, or null
    #[serde(default, deserialize_with = "present_or_null")]
    pub albumart: Option<Option<String>>,
    /// Acknowledgement of a request (`"ok"` or an error string)
    pub result: Option<String>,
}

/// Keep `null` distinguishable from a missing key
fn present_or_null<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Snapshot {
    /// Parse one inbound text frame
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Position as whole milliseconds; negative or non-finite values clamp to 0
    pub fn position_ms(&self) -> Option<u64> {
        self.position.map(clamp_to_u64)
    }

    /// Duration converted to milliseconds
    pub fn duration_ms(&self) -> Option<u64> {
        self.duration.map(|secs| clamp_to_u64(secs * 1000.0))
    }

    /// True when the message only acknowledges a request
    pub fn is_ack_only(&self) -> bool {
        self.result.is_some()
            && Snapshot {
                result: None,
                ..self.clone()
            } == Snapshot::default()
    }
}

fn clamp_to_u64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_json() {
        assert_eq!(ControlAction::Status.to_json().unwrap(), r#"{"action":"status"}"#);
        assert_eq!(
            ControlAction::PlayPause.to_json().unwrap(),
            r#"{"action":"playpause"}"#
        );
        assert_eq!(
            ControlAction::seek_to_ms(12_500).to_json().unwrap(),
            r#"{"action":"seek","time":12.5}"#
        );
    }

    #[test]
    fn test_transport_names_match_actions() {
        for action in [
            TransportAction::Previous,
            TransportAction::PlayPause,
            TransportAction::Next,
        ] {
            let json = ControlAction::from(action).to_json().unwrap();
            assert_eq!(json, format!(r#"{{"action":"{}"}}"#, action));
        }
    }

    #[test]
    fn test_sparse_snapshot() {
        let snapshot = Snapshot::parse(r#"{"playing": true, "position": 1500}"#).unwrap();
        assert_eq!(snapshot.playing, Some(true));
        assert_eq!(snapshot.position_ms(), Some(1500));
        assert!(snapshot.id.is_none());
        assert!(snapshot.albumart.is_none());
    }

    #[test]
    fn test_albumart_null_vs_absent() {
        let null = Snapshot::parse(r#"{"albumart": null}"#).unwrap();
        assert_eq!(null.albumart, Some(None));

        let named = Snapshot::parse(r#"{"albumart": "ab/cd1234"}"#).unwrap();
        assert_eq!(named.albumart, Some(Some("ab/cd1234".to_string())));

        let absent = Snapshot::parse(r#"{"title": "x"}"#).unwrap();
        assert_eq!(absent.albumart, None);
    }

    #[test]
    fn test_fractional_and_negative_positions() {
        let fractional = Snapshot::parse(r#"{"position": 2500.75}"#).unwrap();
        assert_eq!(fractional.position_ms(), Some(2500));

        let negative = Snapshot::parse(r#"{"position": -20}"#).unwrap();
        assert_eq!(negative.position_ms(), Some(0));
    }

    #[test]
    fn test_duration_seconds_to_ms() {
        let snapshot = Snapshot::parse(r#"{"duration": 215}"#).unwrap();
        assert_eq!(snapshot.duration_ms(), Some(215_000));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let snapshot = Snapshot::parse(r#"{"genre": "jazz", "bitrate": 320}"#).unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn test_ack_only() {
        assert!(Snapshot::parse(r#"{"result": "ok"}"#).unwrap().is_ack_only());
        assert!(!Snapshot::parse(r#"{"result": "ok", "playing": true}"#)
            .unwrap()
            .is_ack_only());
        assert!(!Snapshot::default().is_ack_only());
    }

    #[test]
    fn test_malformed_is_error() {
        assert!(Snapshot::parse("not json").is_err());
        assert!(Snapshot::parse(r#"{"playing": "yes"}"#).is_err());
    }
}
