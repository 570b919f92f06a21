//! Serde helpers for the backend's date formats.
//!
//! The backend formats every timestamp as a plain string rather than RFC
//! 3339: `YYYY-MM-DD HH:MM:SS` for order and payment dates, `YYYY-MM-DD`
//! for invoice issue/due dates. These modules plug into `#[serde(with)]`
//! on the wire records.

/// Format string for order and payment timestamps.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format string for invoice dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `#[serde(with = "cornershop_core::datetime::wire_datetime")]` for
/// `NaiveDateTime` fields.
pub mod wire_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::DATETIME_FORMAT;

    /// Serialize as `YYYY-MM-DD HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(&dt.format(DATETIME_FORMAT))
    }

    /// Deserialize from `YYYY-MM-DD HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Fails when the string does not match the wire format.
    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(de)?;
        NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).map_err(D::Error::custom)
    }
}

/// `#[serde(with = "cornershop_core::datetime::wire_date")]` for
/// `NaiveDate` fields.
pub mod wire_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::DATE_FORMAT;

    /// Serialize as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(date: &NaiveDate, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(&date.format(DATE_FORMAT))
    }

    /// Deserialize from `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Fails when the string does not match the wire format.
    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(de)?;
        NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(D::Error::custom)
    }
}
