//! Historical timestamps
//!
//! Race observations carry naive, second-precision timestamps. The dataset
//! writes them as `YYYY-MM-DD HH:MM:SS`; callers of this crate only ever see
//! parsed [`Timestamp`] values.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer};

use crate::{ReplayError, Result};

/// Historical race time (naive, no timezone).
pub type Timestamp = NaiveDateTime;

/// On-disk timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a dataset timestamp.
///
/// Accepts the dataset format and its ISO-8601 `T`-separated variant.
pub fn parse_timestamp(value: &str) -> Result<Timestamp> {
    let trimmed = value.trim();
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, ISO_FORMAT))
        .map_err(|e| {
            ReplayError::parse_error("timestamp", format!("Invalid datetime format: {value} ({e})"))
        })
}

/// Drop any sub-second component.
pub fn truncate_to_second(ts: Timestamp) -> Timestamp {
    ts.with_nanosecond(0).unwrap_or(ts)
}

/// Serde adapter for timestamp columns in dataset files.
pub(crate) fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
