use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339, macros::format_description};

use crate::error::Result;

/// Formats a timestamp the way the Timber API expects date fields: normalized to
/// UTC with millisecond precision, e.g. `2025-04-01T00:00:00.000Z`.
pub fn format_timestamp(datetime: OffsetDateTime) -> Result<String> {
    let format = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    Ok(datetime.to_offset(UtcOffset::UTC).format(&format)?)
}

// Timber returns RFC3339 timestamps; anything else is reported back verbatim.
pub fn parse_timestamp(datetime_str: &str) -> std::result::Result<OffsetDateTime, String> {
    OffsetDateTime::parse(datetime_str, &Rfc3339)
        .map_err(|e| format!("Failed to parse datetime '{datetime_str}': {e}"))
}

// Date-time serialization module for time::OffsetDateTime
pub mod timber_datetime_format {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = super::format_timestamp(*datetime).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let datetime_str = String::deserialize(deserializer)?;
        super::parse_timestamp(&datetime_str).map_err(serde::de::Error::custom)
    }
}

// Optional OffsetDateTime serialization
pub mod timber_datetime_format_option {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub fn serialize<S>(datetime: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match datetime {
            Some(dt) => {
                let formatted = super::format_timestamp(*dt).map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<String>::deserialize(deserializer)?;

        match opt {
            Some(s) if !s.is_empty() => super::parse_timestamp(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
