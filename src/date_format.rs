//! W3C Datetime formatting
//!
//! Sitemaps express `lastmod` and the various publication dates in the
//! [W3C Datetime](https://www.w3.org/TR/NOTE-datetime) profile of ISO 8601.
//! The profile allows six granularities; [`DatePattern::Auto`] picks the
//! coarsest one that loses no information for a given instant.
//!
//! Timestamps are millisecond-precision: anything below a millisecond is
//! truncated before formatting, so `parse(format(t))` reproduces `t`
//! truncated to the millisecond.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Serialize};

use crate::error::{DateFormatError, DateFormatResult};

/// Granularity of a W3C datetime, finest to coarsest, plus automatic selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePattern {
    /// `1997-07-16T19:20:30.450+01:00`
    Millisecond,
    /// `1997-07-16T19:20:30+01:00`
    Second,
    /// `1997-07-16T19:20+01:00`
    Minute,
    /// `1997-07-16`
    Day,
    /// `1997-07`
    Month,
    /// `1997`
    Year,
    /// Coarsest lossless representation, never coarser than [`DatePattern::Day`]
    #[default]
    Auto,
}

impl DatePattern {
    fn has_time(self) -> bool {
        matches!(
            self,
            DatePattern::Millisecond | DatePattern::Second | DatePattern::Minute
        )
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatePattern::Millisecond => "millisecond",
            DatePattern::Second => "second",
            DatePattern::Minute => "minute",
            DatePattern::Day => "day",
            DatePattern::Month => "month",
            DatePattern::Year => "year",
            DatePattern::Auto => "auto",
        };
        f.write_str(name)
    }
}

impl FromStr for DatePattern {
    type Err = DateFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "millisecond" => Ok(DatePattern::Millisecond),
            "second" => Ok(DatePattern::Second),
            "minute" => Ok(DatePattern::Minute),
            "day" => Ok(DatePattern::Day),
            "month" => Ok(DatePattern::Month),
            "year" => Ok(DatePattern::Year),
            "auto" => Ok(DatePattern::Auto),
            _ => Err(DateFormatError::Malformed {
                input: s.to_string(),
                reason: "unknown date pattern".to_string(),
            }),
        }
    }
}

/// The UTC offset, rendered as `Z`
pub fn zulu() -> FixedOffset {
    Utc.fix()
}

/// Parse a timezone designator: `Z` or `±HH:MM`
pub fn parse_timezone(zone: &str) -> DateFormatResult<FixedOffset> {
    if zone == "Z" {
        return Ok(zulu());
    }

    let bytes = zone.as_bytes();
    if !zone.is_ascii() || bytes.len() != 6 || bytes[3] != b':' {
        return Err(DateFormatError::InvalidOffset(zone.to_string()));
    }
    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(DateFormatError::InvalidOffset(zone.to_string())),
    };
    let hours = digits(&zone[1..3], 2).filter(|h| *h <= 23);
    let minutes = digits(&zone[4..6], 2).filter(|m| *m <= 59);

    match (hours, minutes) {
        (Some(h), Some(m)) => FixedOffset::east_opt(sign * (h * 3600 + m * 60) as i32)
            .ok_or_else(|| DateFormatError::InvalidOffset(zone.to_string())),
        _ => Err(DateFormatError::InvalidOffset(zone.to_string())),
    }
}

/// Formats and parses W3C datetimes at a fixed or automatic granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct W3cDateFormat {
    pattern: DatePattern,
    offset: FixedOffset,
}

impl Default for W3cDateFormat {
    fn default() -> Self {
        Self::new(DatePattern::Auto)
    }
}

impl W3cDateFormat {
    /// Create a formatter for `pattern` in UTC
    pub fn new(pattern: DatePattern) -> Self {
        Self {
            pattern,
            offset: zulu(),
        }
    }

    /// Render in the given offset instead of UTC
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Render in the offset described by `zone` (`Z` or `±HH:MM`)
    pub fn with_timezone(self, zone: &str) -> DateFormatResult<Self> {
        Ok(self.with_offset(parse_timezone(zone)?))
    }

    pub fn pattern(&self) -> DatePattern {
        self.pattern
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Format `date` according to this formatter's pattern and offset
    pub fn format(&self, date: &DateTime<Utc>) -> String {
        let truncated = date
            .with_nanosecond(date.nanosecond() / 1_000_000 * 1_000_000)
            .unwrap_or(*date);
        let local = truncated.with_timezone(&self.offset);
        self.format_local(&local, self.pattern)
    }

    fn format_local(&self, local: &DateTime<FixedOffset>, pattern: DatePattern) -> String {
        match pattern {
            DatePattern::Year => local.format("%Y").to_string(),
            DatePattern::Month => local.format("%Y-%m").to_string(),
            DatePattern::Day => local.format("%Y-%m-%d").to_string(),
            DatePattern::Minute => {
                format!("{}{}", local.format("%Y-%m-%dT%H:%M"), self.zone(local))
            }
            DatePattern::Second => {
                format!("{}{}", local.format("%Y-%m-%dT%H:%M:%S"), self.zone(local))
            }
            DatePattern::Millisecond => {
                format!("{}{}", local.format("%Y-%m-%dT%H:%M:%S%.3f"), self.zone(local))
            }
            DatePattern::Auto => self.format_local(local, auto_pattern(local)),
        }
    }

    fn zone(&self, local: &DateTime<FixedOffset>) -> String {
        if self.offset.local_minus_utc() == 0 {
            "Z".to_string()
        } else {
            local.format("%:z").to_string()
        }
    }

    /// Parse a W3C datetime
    ///
    /// The granularity is detected from the shape of `source`. A formatter with a
    /// fixed pattern only accepts input of that granularity; [`DatePattern::Auto`]
    /// accepts all of them. Date-only input is interpreted at midnight in this
    /// formatter's offset.
    pub fn parse(&self, source: &str) -> DateFormatResult<DateTime<Utc>> {
        let detected = detect_pattern(source)?;
        if self.pattern != DatePattern::Auto && self.pattern != detected {
            return Err(DateFormatError::PatternMismatch {
                input: source.to_string(),
                pattern: self.pattern.to_string(),
            });
        }

        if detected.has_time() {
            let (date, time) = source
                .split_once('T')
                .ok_or_else(|| malformed(source, "missing time designator"))?;
            let (clock, offset) = split_zone(source, time)?;
            let date = parse_date(source, date, 3)?;
            let time = parse_clock(source, clock)?;
            resolve(source, offset, NaiveDateTime::new(date, time))
        } else {
            let fields = match detected {
                DatePattern::Year => 1,
                DatePattern::Month => 2,
                _ => 3,
            };
            let date = parse_date(source, source, fields)?;
            resolve(source, self.offset, date.and_time(NaiveTime::MIN))
        }
    }
}

/// Coarsest pattern that reproduces `local` exactly
fn auto_pattern(local: &DateTime<FixedOffset>) -> DatePattern {
    if local.timestamp_subsec_millis() != 0 {
        DatePattern::Millisecond
    } else if local.second() != 0 {
        DatePattern::Second
    } else if local.hour() != 0 || local.minute() != 0 {
        DatePattern::Minute
    } else {
        DatePattern::Day
    }
}

fn detect_pattern(source: &str) -> DateFormatResult<DatePattern> {
    match source.split_once('T') {
        None => match split_year_sign(source).1.matches('-').count() {
            0 => Ok(DatePattern::Year),
            1 => Ok(DatePattern::Month),
            2 => Ok(DatePattern::Day),
            _ => Err(malformed(source, "too many date fields")),
        },
        Some((_, time)) => {
            let (clock, _) = split_zone(source, time)?;
            if clock.contains('.') {
                return Ok(DatePattern::Millisecond);
            }
            match clock.matches(':').count() {
                1 => Ok(DatePattern::Minute),
                2 => Ok(DatePattern::Second),
                _ => Err(malformed(source, "unrecognized time of day")),
            }
        }
    }
}

fn split_zone<'a>(source: &str, time: &'a str) -> DateFormatResult<(&'a str, FixedOffset)> {
    if let Some(clock) = time.strip_suffix('Z') {
        return Ok((clock, zulu()));
    }
    match time.rfind(['+', '-']) {
        Some(pos) => {
            let (clock, zone) = time.split_at(pos);
            Ok((clock, parse_timezone(zone)?))
        }
        None => Err(malformed(source, "missing timezone designator")),
    }
}

fn parse_date(source: &str, date: &str, expected_fields: usize) -> DateFormatResult<NaiveDate> {
    let (sign, unsigned) = split_year_sign(date);
    let fields: Vec<&str> = unsigned.split('-').collect();
    if fields.len() != expected_fields {
        return Err(malformed(source, "unexpected number of date fields"));
    }

    // Years outside 0000-9999 carry a sign and may have more than four digits
    let year = if unsigned.len() == date.len() {
        digits(fields[0], 4)
    } else if (4..=9).contains(&fields[0].len()) {
        digits(fields[0], fields[0].len())
    } else {
        None
    }
    .ok_or_else(|| malformed(source, "year must be four digits"))?;
    let month = match fields.get(1) {
        Some(f) => digits(f, 2).ok_or_else(|| malformed(source, "month must be two digits"))?,
        None => 1,
    };
    let day = match fields.get(2) {
        Some(f) => digits(f, 2).ok_or_else(|| malformed(source, "day must be two digits"))?,
        None => 1,
    };

    NaiveDate::from_ymd_opt(sign * year as i32, month, day)
        .ok_or_else(|| malformed(source, "date out of range"))
}

fn split_year_sign(date: &str) -> (i32, &str) {
    match date.as_bytes().first() {
        Some(b'+') => (1, &date[1..]),
        Some(b'-') => (-1, &date[1..]),
        _ => (1, date),
    }
}

fn parse_clock(source: &str, clock: &str) -> DateFormatResult<NaiveTime> {
    let (hms, fraction) = match clock.split_once('.') {
        Some((hms, fraction)) => (hms, Some(fraction)),
        None => (clock, None),
    };

    let fields: Vec<u32> = hms
        .split(':')
        .map(|f| digits(f, 2))
        .collect::<Option<_>>()
        .ok_or_else(|| malformed(source, "time fields must be two digits"))?;

    let nanos = match fraction {
        Some(f) if !f.is_empty() && f.len() <= 9 && fields.len() == 3 => {
            let value = digits(f, f.len())
                .ok_or_else(|| malformed(source, "fractional seconds must be digits"))?;
            value * 10u32.pow(9 - f.len() as u32)
        }
        Some(_) => return Err(malformed(source, "invalid fractional seconds")),
        None => 0,
    };

    let time = match fields.as_slice() {
        [h, m] => NaiveTime::from_hms_opt(*h, *m, 0),
        [h, m, s] => NaiveTime::from_hms_nano_opt(*h, *m, *s, nanos),
        _ => None,
    };
    time.ok_or_else(|| malformed(source, "time of day out of range"))
}

fn resolve(
    source: &str,
    offset: FixedOffset,
    local: NaiveDateTime,
) -> DateFormatResult<DateTime<Utc>> {
    offset
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| malformed(source, "datetime out of range"))
}

fn digits(s: &str, len: usize) -> Option<u32> {
    if s.len() == len && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

fn malformed(source: &str, reason: &str) -> DateFormatError {
    DateFormatError::Malformed {
        input: source.to_string(),
        reason: reason.to_string(),
    }
}
