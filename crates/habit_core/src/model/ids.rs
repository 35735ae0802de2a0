//! Record identifier generation.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Returns a fresh opaque identifier for users, behaviors and items.
///
/// UUID v7 text: timestamp-prefixed, so ids sort roughly by creation time,
/// with random tail bits keeping same-millisecond ids distinct.
pub fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clocks before the epoch collapse to `0` instead of failing.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
