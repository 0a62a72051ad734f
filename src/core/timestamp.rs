//! Timestamp formats for event time fields
//!
//! Used by [`middleware::timestamp`](crate::middleware::timestamp) and
//! [`middleware::time_format`](crate::middleware::time_format).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// How a point in time is rendered into an event
///
/// Numeric formats render as JSON integers, the others as strings.
///
/// # Examples
///
/// ```
/// use tree_logger::TimestampFormat;
/// use chrono::Utc;
///
/// let stamp = TimestampFormat::Iso8601.format(&Utc::now()).unwrap();
/// assert!(stamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Seconds since the Unix epoch
    Unix,

    /// Milliseconds since the Unix epoch
    UnixMillis,

    /// Microseconds since the Unix epoch
    UnixMicros,

    /// A strftime pattern
    Custom(String),
}

impl TimestampFormat {
    /// Render `datetime` as text
    ///
    /// Returns `None` when a custom pattern contains an invalid specifier.
    pub fn format(&self, datetime: &DateTime<Utc>) -> Option<String> {
        let pattern = match self {
            TimestampFormat::Iso8601 => "%Y-%m-%dT%H:%M:%S%.3fZ",
            TimestampFormat::Iso8601Micros => "%Y-%m-%dT%H:%M:%S%.6fZ",
            TimestampFormat::Rfc3339 => return Some(datetime.to_rfc3339()),
            TimestampFormat::Custom(pattern) => pattern.as_str(),
            numeric => return numeric.numeric(datetime).map(|n| n.to_string()),
        };
        let mut out = String::new();
        write!(out, "{}", datetime.format(pattern)).ok()?;
        Some(out)
    }

    /// The integer value of a numeric format, `None` for textual ones
    pub fn numeric(&self, datetime: &DateTime<Utc>) -> Option<i64> {
        match self {
            TimestampFormat::Unix => Some(datetime.timestamp()),
            TimestampFormat::UnixMillis => Some(datetime.timestamp_millis()),
            TimestampFormat::UnixMicros => Some(datetime.timestamp_micros()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TimestampFormat::Unix | TimestampFormat::UnixMillis | TimestampFormat::UnixMicros
        )
    }
}
