use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Column order of the message log; also the header row.
pub const HEADER: [&str; 8] = [
    "message_id",
    "timestamp",
    "from.first_name",
    "from.last_name",
    "from.id",
    "text",
    "lat",
    "lon",
];

/// Dot-paths copied verbatim out of an inbound message, in column order.
pub const MESSAGE_FIELDS: [&str; 5] = [
    "message_id",
    "from.first_name",
    "from.last_name",
    "from.id",
    "text",
];

/// `YYYY-MM-DD HH:MM:SS`, always UTC.
pub const TIMESTAMP_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// One extracted message, serialized as a single log row.
///
/// ```
/// use msglog_core::{Coordinate, Record};
///
/// let record = Record {
///     message_id: "42".into(),
///     timestamp: "2024-01-01 00:00:00".into(),
///     first_name: "Kostas".into(),
///     last_name: String::new(),
///     sender_id: "7".into(),
///     text: "hi".into(),
///     lat: 37.9838,
///     lon: 23.7275,
/// };
/// assert_eq!(record.coordinate(), Coordinate::new(37.9838, 23.7275));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub message_id: String,
    pub timestamp: String,
    #[serde(rename = "from.first_name")]
    pub first_name: String,
    #[serde(rename = "from.last_name")]
    pub last_name: String,
    #[serde(rename = "from.id")]
    pub sender_id: String,
    pub text: String,
    pub lat: f64,
    pub lon: f64,
}

impl Record {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}
