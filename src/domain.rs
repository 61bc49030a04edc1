/// Account and booking entities
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Wire format for booking times, e.g. `2022-01-01 00:00:00`
pub const BOOKING_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    #[serde(with = "booking_time")]
    pub start_time: NaiveDateTime,
    #[serde(with = "booking_time")]
    pub end_time: NaiveDateTime,
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    #[serde(with = "booking_time")]
    pub start_time: NaiveDateTime,
    #[serde(with = "booking_time")]
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub comment: String,
}

impl NewBooking {
    /// Bookings must cover a non-empty time range
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end_time <= self.start_time {
            return Err(ValidationError::InvalidTimeRange);
        }
        Ok(())
    }
}

pub mod booking_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::BOOKING_TIME_FORMAT;

    pub fn serialize<S>(dt: &NaiveDateTime, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.serialize_str(&dt.format(BOOKING_TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deser: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deser)?;
        NaiveDateTime::parse_from_str(&s, BOOKING_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_booking(start: &str, end: &str) -> NewBooking {
        serde_json::from_value(serde_json::json!({
            "start_time": start,
            "end_time": end,
            "comment": "test"
        }))
        .expect("Failed to parse booking")
    }

    #[test]
    fn test_booking_time_format() {
        let booking = new_booking("2022-01-01 00:00:00", "2022-01-01 01:00:00");
        assert!(booking.validate().is_ok());

        let stored = Booking {
            id: 1,
            user_id: 7,
            start_time: booking.start_time,
            end_time: booking.end_time,
            comment: booking.comment,
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["start_time"], "2022-01-01 00:00:00");
        assert_eq!(json["end_time"], "2022-01-01 01:00:00");
    }

    #[test]
    fn test_empty_or_inverted_range() {
        assert_eq!(
            new_booking("2022-01-01 01:00:00", "2022-01-01 01:00:00").validate(),
            Err(ValidationError::InvalidTimeRange)
        );
        assert!(new_booking("2022-01-01 02:00:00", "2022-01-01 01:00:00")
            .validate()
            .is_err());
    }

    #[test]
    fn test_rejects_other_time_formats() {
        let parsed: Result<NewBooking, _> = serde_json::from_value(serde_json::json!({
            "start_time": "2022-01-01T00:00:00Z",
            "end_time": "2022-01-01 01:00:00"
        }));
        assert!(parsed.is_err());
    }
}
