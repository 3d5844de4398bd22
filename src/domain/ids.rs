//! Identifier generation.

use chrono::{DateTime, Utc};

/// Identifier derived from a creation time: decimal Unix milliseconds.
pub fn timestamp_id(now: DateTime<Utc>) -> String {
    now.timestamp_millis().to_string()
}
