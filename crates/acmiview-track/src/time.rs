//! Timestamp arithmetic shared by the trajectory store, the registry and the parser.

use chrono::{DateTime, Duration, Utc};

/// Absolute sample time.
pub type Timestamp = DateTime<Utc>;

/// Signed number of seconds from `from` to `to`.
pub fn seconds_between(from: Timestamp, to: Timestamp) -> f64 {
    let delta = to - from;
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1e9,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

/// `t` shifted by a (possibly fractional or negative) number of seconds.
///
/// Returns `None` for non-finite offsets and for results outside the representable range.
pub fn offset_by(t: Timestamp, seconds: f64) -> Option<Timestamp> {
    if !seconds.is_finite() {
        return None;
    }
    let nanos = (seconds * 1e9).round();
    if nanos.abs() >= i64::MAX as f64 {
        return None;
    }
    t.checked_add_signed(Duration::nanoseconds(nanos as i64))
}
