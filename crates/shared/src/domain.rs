use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(EventId);
id_newtype!(VenueId);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub logo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub location: GeoPoint,
    pub show_name: String,
    pub starts_at: DateTime<FixedOffset>,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub venue: Venue,
}

impl Event {
    /// Calendar day of the start time, in the offset the timestamp was published with.
    pub fn day(&self) -> NaiveDate {
        self.starts_at.date_naive()
    }

    /// 24-hour `HH:MM` label shown in list rows and the detail popup.
    pub fn start_time_label(&self) -> String {
        self.starts_at.format("%H:%M").to_string()
    }

    pub fn is_co_located_with(&self, other: &Event) -> bool {
        self.venue.id == other.venue.id && self.day() == other.day()
    }
}

/// Parses the timestamp formats the events API emits. Timestamps without an
/// offset are taken as UTC.
pub fn parse_event_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive).into())
}

/// Day-granularity key used for event queries and the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateKey(pub NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `date_from` query value: the start of the day without an offset.
    pub fn day_start(&self) -> String {
        format!("{}T00:00:00", self.0.format("%Y-%m-%d"))
    }

    /// Accepts either `YYYY-MM-DD` or a day-start timestamp such as `2024-06-01T00:00:00`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let day = raw.split('T').next().unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok().map(Self)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.day_start())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateOption {
    pub label: String,
    pub key: DateKey,
}

/// Builds the date selector: `days` consecutive days beginning with `today`.
pub fn upcoming_dates(today: NaiveDate, days: usize) -> Vec<DateOption> {
    (0..days)
        .map(|offset| {
            let date = today + Duration::days(offset as i64);
            let label = if offset == 0 {
                "Today".to_string()
            } else {
                date.format("%a").to_string()
            };
            DateOption {
                label,
                key: DateKey(date),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserPosition {
    pub lat: f64,
    pub lng: f64,
    pub heading: f64,
}

impl UserPosition {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
