//! Headless local stream
//!
//! Stand-in media element for terminals: it has no audio output, mirrors
//! play/pause/seek into the log, and reports its whole timeline seekable.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::sync::{MediaElement, MediaFactory, TimeRange, TrackEpoch};

/// Creates [`HeadlessElement`]s and reports them ready at once
pub struct HeadlessFactory {
    base_url: String,
    ready: UnboundedSender<TrackEpoch>,
}

impl HeadlessFactory {
    /// `base_url` is prefixed to the signed stream path for logging
    pub fn new(base_url: impl Into<String>, ready: UnboundedSender<TrackEpoch>) -> Self {
        Self {
            base_url: base_url.into(),
            ready,
        }
    }
}

impl MediaFactory for HeadlessFactory {
    type Element = HeadlessElement;

    fn create(&mut self, url: &str, epoch: TrackEpoch) -> HeadlessElement {
        info!("Local stream {}{} ({})", self.base_url, url, epoch);
        if self.ready.send(epoch).is_err() {
            debug!("Readiness for {} dropped, driver gone", epoch);
        }
        HeadlessElement {
            epoch,
            position: 0.0,
            playing: false,
        }
    }
}

/// Local stream element without an audio sink
#[derive(Debug)]
pub struct HeadlessElement {
    epoch: TrackEpoch,
    position: f64,
    playing: bool,
}

impl HeadlessElement {
    pub fn epoch(&self) -> TrackEpoch {
        self.epoch
    }

    /// Last forced position in seconds
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl MediaElement for HeadlessElement {
    fn seekable(&self) -> Vec<TimeRange> {
        vec![TimeRange::new(0.0, f64::INFINITY)]
    }

    fn set_current_time(&mut self, seconds: f64) {
        debug!("Local stream ({}) at {:.3}s", self.epoch, seconds);
        self.position = seconds;
    }

    fn play(&mut self) {
        if !self.playing {
            debug!("Local stream ({}) playing", self.epoch);
        }
        self.playing = true;
    }

    fn pause(&mut self) {
        if self.playing {
            debug!("Local stream ({}) paused", self.epoch);
        }
        self.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_create_signals_ready() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut factory = HeadlessFactory::new("http://localhost:8000", tx);
        let epoch = TrackEpoch::default().next();
        let element = factory.create("/entry/current/stream?sig=0&ts=0", epoch);

        assert_eq!(element.epoch(), epoch);
        assert_eq!(rx.try_recv().unwrap(), epoch);
    }

    #[test]
    fn test_whole_timeline_seekable() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut factory = HeadlessFactory::new("", tx);
        let mut element = factory.create("/s", TrackEpoch::default());

        assert!(crate::sync::can_seek_to(&element.seekable(), 86_400.0));
        element.set_current_time(12.5);
        element.play();
        assert_eq!(element.position(), 12.5);
        assert!(element.is_playing());
    }
}
