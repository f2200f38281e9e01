//! Millisecond-precision UTC timestamps in the `YYYY-MM-DDTHH:MM:SS.sssZ`
//! form used on the wire.

use serde::{de, Deserialize, Deserializer, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

/// The current time, truncated to whole milliseconds so that it
/// survives formatting and parsing unchanged.
pub fn now() -> OffsetDateTime {
    truncate(OffsetDateTime::now_utc())
}

/// Drops everything below the millisecond.
pub fn truncate(instant: OffsetDateTime) -> OffsetDateTime {
    instant - Duration::nanoseconds(i64::from(instant.nanosecond() % 1_000_000))
}

/// Milliseconds since the Unix epoch.
pub fn unix_millis(instant: OffsetDateTime) -> i128 {
    instant.unix_timestamp_nanos() / 1_000_000
}

pub fn format(instant: OffsetDateTime) -> Result<String, time::error::Format> {
    instant.to_offset(UtcOffset::UTC).format(FORMAT)
}

/// Parses a string that must match the wire format exactly: four-digit
/// year, two-digit fields, three fractional digits and a literal `Z`.
pub fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(raw, FORMAT).map(PrimitiveDateTime::assume_utc)
}

pub fn serialize<S>(instant: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where S: Serializer {
    use serde::ser::Error;

    let formatted = format(*instant).map_err(S::Error::custom)?;
    serializer.serialize_str(&formatted)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where D: Deserializer<'de> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn formats_with_three_fractional_digits() {
        let instant = datetime!(2024-03-05 07:08:09.1 UTC);

        assert_eq!(format(instant).unwrap(), "2024-03-05T07:08:09.100Z");
    }

    #[test]
    fn formats_other_offsets_in_utc() {
        let instant = datetime!(2024-03-05 02:00:00 -5);

        assert_eq!(format(instant).unwrap(), "2024-03-05T07:00:00.000Z");
    }

    #[test]
    fn parses_the_wire_format() {
        let parsed = parse("2023-12-31T23:59:59.999Z").unwrap();

        assert_eq!(parsed, datetime!(2023-12-31 23:59:59.999 UTC));
    }

    #[test]
    fn rejects_near_misses() {
        for raw in &[
            "3 may",
            "",
            "2023-12-31",
            "2023-12-31T23:59:59Z",
            "2023-12-31T23:59:59.99Z",
            "2023-12-31T23:59:59.9999Z",
            "2023-12-31T23:59:59.999",
            "2023-12-31T23:59:59.999+00:00",
            "2023-12-31 23:59:59.999Z",
            "2023-13-01T00:00:00.000Z",
            "2023-1-01T00:00:00.000Z",
        ] {
            assert!(parse(raw).is_err(), "{:?} must be rejected", raw);
        }
    }

    #[test]
    fn truncation_keeps_milliseconds() {
        let instant = datetime!(2024-01-01 00:00:00.123456789 UTC);

        assert_eq!(truncate(instant), datetime!(2024-01-01 00:00:00.123 UTC));
        assert_eq!(unix_millis(truncate(instant)) % 1000, 123);
    }

    #[test]
    fn now_round_trips() {
        let instant = now();
        let formatted = format(instant).unwrap();

        assert_eq!(parse(&formatted).unwrap(), instant);
    }
}
