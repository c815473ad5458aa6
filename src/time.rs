//! RFC3339 timestamps for artifact `create_time`
//!
//! Timestamps are always UTC with microsecond precision and a literal `Z`
//! suffix, e.g. `2019-03-04T18:06:21.123456Z`.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// Current time as an RFC3339 UTC string.
#[must_use]
pub fn rfc3339_now() -> String {
    format_rfc3339(&now_micros())
}

/// Current UTC time truncated to microseconds, the precision kept on the wire.
#[must_use]
pub fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Format a UTC timestamp as `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
#[must_use]
pub fn format_rfc3339(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Serde adapter storing a `DateTime<Utc>` as its RFC3339 string.
pub mod rfc3339_micros {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_rfc3339(time))
    }

    /// Parse any RFC3339 timestamp and normalize it to UTC.
    ///
    /// # Errors
    ///
    /// Fails if the string is not RFC3339.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_has_micros_and_zulu() {
        let time = Utc.with_ymd_and_hms(2019, 3, 4, 18, 6, 21).unwrap();
        assert_eq!(format_rfc3339(&time), "2019-03-04T18:06:21.000000Z");
    }

    #[test]
    fn test_now_micros_survives_formatting() {
        let now = now_micros();
        let parsed = DateTime::parse_from_rfc3339(&format_rfc3339(&now)).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), now);
    }

    #[test]
    fn test_now_parses_back() {
        let now = rfc3339_now();
        assert!(now.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
