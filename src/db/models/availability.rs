use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// The open-slot set a professor publishes for a single day.
/// At most one record exists per (professor_id, date).
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub id: Uuid,
    pub professor_id: Uuid,
    pub date: Date,
    pub slots: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewAvailability {
    pub professor_id: Uuid,
    pub date: Date,
    pub slots: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAvailabilityPayload {
    pub date: String,
    pub slots: Vec<String>,
}

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` calendar date. Availability and appointments are
/// day-granular; there is no time-of-day component.
pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, DATE_FORMAT)
}

/// A bookable time label: zero-padded `HH:MM`, hour 00-23, minute 00-59.
pub fn slot_is_valid(label: &str) -> bool {
    let bytes = label.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    if !bytes[0].is_ascii_digit()
        || !bytes[1].is_ascii_digit()
        || !bytes[3].is_ascii_digit()
        || !bytes[4].is_ascii_digit()
    {
        return false;
    }
    let hour = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
    let minute = (bytes[3] - b'0') * 10 + (bytes[4] - b'0');
    hour <= 23 && minute <= 59
}

/// The externally observable open-slot set: stored slots minus slots that
/// currently back a booked appointment. Both the booking path and the query
/// path agree through this one derivation.
pub fn open_slots(raw: &[String], booked: &[String]) -> Vec<String> {
    raw.iter()
        .filter(|slot| !booked.iter().any(|b| b == *slot))
        .cloned()
        .collect()
}
