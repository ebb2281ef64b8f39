//! Line commands typed by the user

use webremote_common::protocol::TransportAction;

use crate::sync::SyncEvent;
use crate::{Error, Result};

/// Parsed user input
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Event(SyncEvent),
    Quit,
}

/// Parse one input line
///
/// | Input | Effect |
/// |---|---|
/// | `play`, `pause` | toggle play/pause on the player |
/// | `next`, `prev` | skip |
/// | `seek <secs>` | seek the player |
/// | `stream` | toggle the local stream |
/// | `status` | request a full snapshot |
/// | `quit` | close the channel |
pub fn parse_command(line: &str) -> Result<UserCommand> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(Error::InvalidCommand("empty command".to_string()));
    };
    let argument = words.next();
    if words.next().is_some() {
        return Err(Error::InvalidCommand(format!("too many arguments: {}", line.trim())));
    }

    let event = match (verb.to_ascii_lowercase().as_str(), argument) {
        ("play" | "pause" | "playpause", None) => SyncEvent::Transport(TransportAction::PlayPause),
        ("next", None) => SyncEvent::Transport(TransportAction::Next),
        ("prev" | "previous", None) => SyncEvent::Transport(TransportAction::Previous),
        ("stream", None) => SyncEvent::ToggleStream,
        ("status", None) => SyncEvent::RefreshStatus,
        ("quit" | "exit", None) => return Ok(UserCommand::Quit),
        ("seek", Some(secs)) => SyncEvent::Seek {
            position_ms: parse_seconds(secs)?,
        },
        ("seek", None) => {
            return Err(Error::InvalidCommand("seek needs a position in seconds".to_string()))
        }
        (other, _) => return Err(Error::InvalidCommand(format!("unknown command '{}'", other))),
    };
    Ok(UserCommand::Event(event))
}

fn parse_seconds(text: &str) -> Result<u64> {
    let secs: f64 = text
        .parse()
        .map_err(|_| Error::InvalidCommand(format!("not a number: {}", text)))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(Error::InvalidCommand(format!("position out of range: {}", text)));
    }
    Ok((secs * 1000.0).round() as u64)
}
