//! Tolerant field decoding for stored documents.
//!
//! Entries in the store may predate the current layout or come from the
//! legacy flat slots. A field that is missing, null or of an unexpected
//! type decodes to an empty value instead of rejecting the whole entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Any scalar as text. Null, arrays and objects become `""`.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Like [`text`], with `""` mapped to `None`.
pub fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = text(deserializer)?;
    Ok((!value.is_empty()).then_some(value))
}

/// RFC 3339 string or Unix milliseconds. Anything else is the epoch.
pub fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_default(),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or_default(),
        _ => DateTime::default(),
    })
}

/// Write `None` as `""`, the layout older readers expect.
#[allow(clippy::ref_option)]
pub fn empty_if_none<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or_default())
}
