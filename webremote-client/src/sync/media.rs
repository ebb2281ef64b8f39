//! Local media element seam
//!
//! The engine drives a secondary player for the redundant local stream
//! through these traits. Creation and seeking are readiness-driven: the
//! element reports what it can seek to and signals readiness through a
//! [`crate::SyncEvent::MediaReady`] event; the engine never waits on it.

use super::state::TrackEpoch;

/// Seekable time span in seconds, `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Secondary media player bound to one stream URL
pub trait MediaElement {
    /// Seekable ranges in the element's own order
    fn seekable(&self) -> Vec<TimeRange>;

    /// Force the playback position (seconds)
    fn set_current_time(&mut self, seconds: f64);

    fn play(&mut self);

    fn pause(&mut self);
}

/// Creates media elements for the local stream
pub trait MediaFactory {
    type Element: MediaElement;

    /// Create an element for `url` following track `epoch`
    ///
    /// The element should emit a readiness notification tagged with `epoch`
    /// once it has buffered enough to seek.
    fn create(&mut self, url: &str, epoch: TrackEpoch) -> Self::Element;
}

/// Whether `target` seconds is reachable in `ranges`
///
/// Ranges are scanned in the order given. A range starting after the target
/// ends the scan with `false` before its end is looked at, even if a later
/// range would cover the target. This ordering is the established policy for
/// out-of-order range sets and is kept as is.
///
/// # Examples
///
/// ```
/// use webremote_client::sync::{can_seek_to, TimeRange};
///
/// let ranges = [TimeRange::new(0.0, 10.0)];
/// assert!(can_seek_to(&ranges, 5.0));
/// assert!(!can_seek_to(&ranges, 15.0));
/// ```
pub fn can_seek_to(ranges: &[TimeRange], target: f64) -> bool {
    for range in ranges {
        if range.start > target {
            return false;
        }
        if range.end > target {
            return true;
        }
    }
    false
}
