//! Module dedicated to email timestamps.
//!
//! Date headers are not uniformly formatted across mail clients: the
//! timezone part may be a bare numeric offset (`-0400`) or carry an
//! additional parenthesized name (`-0400 (EDT)`), and `strptime`-like
//! `%z` parsing rejects some historical shapes. This module parses
//! the header positionally instead, so that every shape actually seen
//! from the mail provider resolves to a comparable instant.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use std::{result, str::FromStr};
use thiserror::Error;

/// The fixed pattern rebuilding the date time part of the header,
/// like `Thu, 7 Apr 2011 08:34:04`. No locale dependence.
const DATE_TIME_FMT: &str = "%a, %d %b %Y %H:%M:%S";

/// The zone label used when the header carries no parenthesized
/// timezone name.
pub const UNKNOWN_ZONE: &str = "UNKNOWN";

/// The global `Result` alias of the module.
pub type Result<T> = result::Result<T, Error>;

/// Errors related to timestamp parsing.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot split date header {0}: missing date or timezone tokens")]
    SplitRawDateError(String),
    #[error("cannot parse date time from header {1}")]
    ParseNaiveDateTimeError(#[source] chrono::ParseError, String),
    #[error("cannot parse sign of timezone offset {0}")]
    ParseOffsetSignError(String),
    #[error("cannot parse digits of timezone offset {0}")]
    ParseOffsetDigitsError(String),
    #[error("cannot build timezone from offset {0} minutes")]
    BuildTimezoneError(i32),
    #[error("cannot resolve date time {0} in timezone offset {1} minutes")]
    ResolveDateTimeError(String, i32),
}

/// The timezone-aware instant a date header resolves to.
///
/// Derived once per message and never mutated. Two timestamps
/// compare on a UTC-normalized basis regardless of their offsets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Timestamp {
    /// The point in time the header represents.
    pub instant: DateTime<FixedOffset>,

    /// The signed offset east of UTC, in minutes.
    pub offset_minutes: i32,

    /// The parenthesized timezone name following the offset, or
    /// [`UNKNOWN_ZONE`] when absent.
    pub zone: String,
}

/// Parse a timestamp from a raw date header.
///
/// The header is split on whitespace: the first five tokens rebuild
/// the date time (`Weekday, D Month YYYY HH:MM:SS`), the sixth is the
/// numeric timezone offset, and an optional seventh is the
/// parenthesized timezone name.
impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.len() < 6 {
            return Err(Error::SplitRawDateError(raw.trim().to_owned()));
        }

        let date_time_str = tokens[..5].join(" ");
        let naive = NaiveDateTime::parse_from_str(&date_time_str, DATE_TIME_FMT)
            .map_err(|err| Error::ParseNaiveDateTimeError(err, raw.trim().to_owned()))?;

        let offset_minutes = parse_offset_minutes(tokens[5])?;
        let tz = FixedOffset::east_opt(offset_minutes * 60)
            .ok_or(Error::BuildTimezoneError(offset_minutes))?;

        let instant = naive
            .and_local_timezone(tz)
            .single()
            .ok_or_else(|| Error::ResolveDateTimeError(date_time_str, offset_minutes))?;

        let zone = tokens
            .get(6)
            .map(|name| name.trim_matches(|c: char| c == '(' || c == ')').to_owned())
            .unwrap_or_else(|| UNKNOWN_ZONE.to_owned());

        Ok(Timestamp {
            instant,
            offset_minutes,
            zone,
        })
    }
}

/// Extract the signed offset in minutes from a `±HHMM` token.
///
/// Sign, hour and minute digits are taken positionally, so trailing
/// characters after the fourth digit are tolerated.
fn parse_offset_minutes(token: &str) -> Result<i32> {
    let sign = match token.chars().next() {
        Some('+') => 1,
        Some('-') => -1,
        _ => return Err(Error::ParseOffsetSignError(token.to_owned())),
    };

    let hours: i32 = token
        .get(1..3)
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| Error::ParseOffsetDigitsError(token.to_owned()))?;
    let minutes: i32 = token
        .get(3..5)
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| Error::ParseOffsetDigitsError(token.to_owned()))?;

    Ok(sign * (hours * 60 + minutes))
}

#[cfg(test)]
mod tests {
    use super::Timestamp;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parse_with_zone_name() {
        let timestamp: Timestamp = "Thu, 7 Apr 2011 08:34:04 -0400 (EDT)".parse().unwrap();

        assert_eq!(timestamp.offset_minutes, -240);
        assert_eq!(timestamp.zone, "EDT");
        assert_eq!(
            timestamp.instant,
            Utc.with_ymd_and_hms(2011, 4, 7, 12, 34, 4).unwrap()
        );
    }

    #[test]
    fn parse_without_zone_name() {
        let timestamp: Timestamp = "Thu, 7 Apr 2011 08:34:04 -0400".parse().unwrap();

        assert_eq!(timestamp.zone, "UNKNOWN");
        assert_eq!(
            timestamp.instant,
            Utc.with_ymd_and_hms(2011, 4, 7, 12, 34, 4).unwrap()
        );
    }

    #[test]
    fn zone_name_does_not_change_instant() {
        let named: Timestamp = "Thu, 7 Apr 2011 08:34:04 -0400 (EDT)".parse().unwrap();
        let bare: Timestamp = "Thu, 7 Apr 2011 08:34:04 -0400".parse().unwrap();

        assert_eq!(named.instant, bare.instant);
    }

    #[test]
    fn parse_positive_offset() {
        let timestamp: Timestamp = "Sat, 1 Jan 2022 10:00:00 +0530 (IST)".parse().unwrap();

        assert_eq!(timestamp.offset_minutes, 330);
        assert_eq!(
            timestamp.instant,
            Utc.with_ymd_and_hms(2022, 1, 1, 4, 30, 0).unwrap()
        );
    }

    #[test]
    fn parse_zero_offset() {
        let timestamp: Timestamp = "Fri, 25 Dec 2020 00:00:00 +0000".parse().unwrap();

        assert_eq!(timestamp.offset_minutes, 0);
        assert_eq!(
            timestamp.instant,
            Utc.with_ymd_and_hms(2020, 12, 25, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn parse_tolerates_surrounding_whitespace() {
        let timestamp: Timestamp = "  Thu, 7 Apr 2011 08:34:04 -0400 (EDT)  ".parse().unwrap();

        assert_eq!(timestamp.zone, "EDT");
    }

    #[test]
    fn parse_fails_on_missing_timezone_token() {
        let res = "Thu, 7 Apr 2011 08:34:04".parse::<Timestamp>();

        assert!(matches!(
            res.unwrap_err(),
            super::Error::SplitRawDateError(_)
        ));
    }

    #[test]
    fn parse_fails_on_empty_header() {
        let res = "".parse::<Timestamp>();

        assert!(matches!(
            res.unwrap_err(),
            super::Error::SplitRawDateError(_)
        ));
    }

    #[test]
    fn parse_fails_on_garbled_date_time() {
        let res = "Thu, 7 NotAMonth 2011 08:34:04 -0400".parse::<Timestamp>();

        assert!(matches!(
            res.unwrap_err(),
            super::Error::ParseNaiveDateTimeError(_, _)
        ));
    }

    #[test]
    fn parse_fails_on_unsigned_offset() {
        let res = "Thu, 7 Apr 2011 08:34:04 0400".parse::<Timestamp>();

        assert!(matches!(
            res.unwrap_err(),
            super::Error::ParseOffsetSignError(_)
        ));
    }

    #[test]
    fn parse_fails_on_short_offset() {
        let res = "Thu, 7 Apr 2011 08:34:04 -04".parse::<Timestamp>();

        assert!(matches!(
            res.unwrap_err(),
            super::Error::ParseOffsetDigitsError(_)
        ));
    }
}
