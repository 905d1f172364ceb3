use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// A date-time without zone, interpreted as UTC.
///
/// `Display` renders the external form `YYYY-MM-DD HH:MM:SS`; serde uses
/// RFC 3339 so stored documents keep sub-second precision. Parsing accepts
/// RFC 3339 (converted to UTC) as well as naive `T`- or space-separated forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub PrimitiveDateTime);

impl Timestamp {
    pub fn new(datetime: PrimitiveDateTime) -> Self {
        Self(datetime)
    }

    /// Converts an offset date-time to UTC and drops the offset.
    fn from_offset(datetime: OffsetDateTime) -> Option<Self> {
        let utc = datetime.checked_to_offset(UtcOffset::UTC)?;
        Some(Self(PrimitiveDateTime::new(utc.date(), utc.time())))
    }

    /// Only four-digit, non-negative years have an RFC 3339 rendering.
    fn within_rfc3339_range(self, input: &str) -> Result<Self> {
        if (0..=9999).contains(&self.0.year()) {
            Ok(self)
        } else {
            Err(CoreError::invalid_timestamp(format!("year out of range in '{input}'")))
        }
    }

    /// RFC 3339 rendering in UTC, the form kept in stored documents.
    pub fn to_rfc3339(&self) -> Result<String> {
        self.0
            .assume_utc()
            .format(&Rfc3339)
            .map_err(|e| CoreError::invalid_timestamp(format!("{self}: {e}")))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .0
            .format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second]"
            ))
            .map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl FromStr for Timestamp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(datetime) = OffsetDateTime::parse(s, &Rfc3339) {
            return Self::from_offset(datetime)
                .ok_or_else(|| {
                    CoreError::invalid_timestamp(format!("year out of range in '{s}'"))
                })?
                .within_rfc3339_range(s);
        }

        PrimitiveDateTime::parse(
            s,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        )
        .or_else(|_| {
            PrimitiveDateTime::parse(
                s,
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
            )
        })
        .or_else(|_| {
            PrimitiveDateTime::parse(
                s,
                format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
            )
        })
        .or_else(|_| {
            PrimitiveDateTime::parse(
                s,
                format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
            )
        })
        .map(Self)
        .map_err(|e| CoreError::invalid_timestamp(format!("failed to parse '{s}': {e}")))?
        .within_rfc3339_range(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self.to_rfc3339().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timestamp::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<PrimitiveDateTime> for Timestamp {
    fn from(datetime: PrimitiveDateTime) -> Self {
        Self(datetime)
    }
}
