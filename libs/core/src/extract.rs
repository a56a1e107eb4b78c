//! Turns an inbound message into a timestamped, geotagged [`Record`].

use serde_json::Value;
use time::OffsetDateTime;

use crate::coordinate::{CoordinateResolver, RandomPointResolver};
use crate::error::ExtractError;
use crate::path::{deep_get, is_present};
use crate::record::{Record, TIMESTAMP_FORMAT};

/// Extracts the whitelisted message fields and stamps them with the current
/// time and a resolved coordinate.
#[derive(Debug, Clone)]
pub struct Extractor<R = RandomPointResolver> {
    resolver: R,
}

impl Extractor {
    /// Extractor backed by the placeholder random-point resolver.
    pub fn new() -> Self {
        Self::with_resolver(RandomPointResolver::default())
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CoordinateResolver> Extractor<R> {
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    /// Builds a record stamped with the current UTC time.
    ///
    /// ```
    /// use msglog_core::{Extractor, KNOWN_POINTS};
    /// use serde_json::json;
    ///
    /// let extractor = Extractor::new();
    /// let record = extractor
    ///     .extract(&json!({ "message_id": 42, "from": { "first_name": "Kostas", "id": 7 } }))
    ///     .unwrap();
    /// assert_eq!(record.message_id, "42");
    /// assert_eq!(record.first_name, "Kostas");
    /// assert_eq!(record.last_name, "");
    /// assert!(KNOWN_POINTS.contains(&record.coordinate()));
    /// ```
    pub fn extract(&self, message: &Value) -> Result<Record, ExtractError> {
        self.extract_at(message, OffsetDateTime::now_utc())
    }

    /// Builds a record stamped with `now` instead of the wall clock.
    pub fn extract_at(&self, message: &Value, now: OffsetDateTime) -> Result<Record, ExtractError> {
        if !is_present(message) {
            return Err(ExtractError::EmptyMessage);
        }
        let coordinate = self.resolver.resolve(message)?;

        Ok(Record {
            message_id: deep_get(message, "message_id"),
            timestamp: format_timestamp(now)?,
            first_name: deep_get(message, "from.first_name"),
            last_name: deep_get(message, "from.last_name"),
            sender_id: deep_get(message, "from.id"),
            text: deep_get(message, "text"),
            lat: coordinate.lat,
            lon: coordinate.lon,
        })
    }
}

/// Formats `at` as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, ExtractError> {
    Ok(at.to_offset(time::UtcOffset::UTC).format(TIMESTAMP_FORMAT)?)
}
