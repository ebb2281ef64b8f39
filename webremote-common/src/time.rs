//! Timestamp utilities

use chrono::Utc;

/// Current wall-clock time in Unix epoch milliseconds
///
/// This is the `ts` value carried by every signed request.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Milliseconds from `since_ms` to `now_ms`; zero if the clock went backwards
pub fn elapsed_ms(since_ms: i64, now_ms: i64) -> u64 {
    u64::try_from(now_ms.saturating_sub(since_ms)).unwrap_or(0)
}
