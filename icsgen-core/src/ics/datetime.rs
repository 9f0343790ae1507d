//! DTSTART / DTEND rendering.
//!
//! Whether a value is all-day or timed is decided by its lexical form alone:
//! a `T` or a space marks a date-time. Date-times keep the wall-clock fields
//! as written; any explicit offset only matters for telling a zero offset
//! apart from everything else.

use chrono::{Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
    "%Y%m%dT%H%M",
];

/// How a start/end value is written out when no TZID applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeKind {
    /// All-day value
    Date,
    /// Date-time with an explicit zero offset ("Z", "+00:00")
    ZeroOffset,
    /// Date-time with a non-zero offset or none at all
    Unanchored,
}

/// A parsed `start`/`end` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeValue {
    Date(NaiveDate),
    DateTime {
        datetime: NaiveDateTime,
        offset: Option<FixedOffset>,
    },
}

impl TimeValue {
    /// Parse an ISO-8601-like string. Returns None if it cannot be read as
    /// the shape its lexical form announces.
    pub fn parse(input: &str) -> Option<Self> {
        if is_date_time(input) {
            parse_date_time(input)
        } else {
            parse_date(input).map(TimeValue::Date)
        }
    }

    pub fn kind(&self) -> TimeKind {
        match self {
            TimeValue::Date(_) => TimeKind::Date,
            TimeValue::DateTime {
                offset: Some(offset),
                ..
            } if offset.local_minus_utc() == 0 => TimeKind::ZeroOffset,
            TimeValue::DateTime { .. } => TimeKind::Unanchored,
        }
    }

    fn date(&self) -> NaiveDate {
        match self {
            TimeValue::Date(d) => *d,
            TimeValue::DateTime { datetime, .. } => datetime.date(),
        }
    }

    fn datetime(&self) -> NaiveDateTime {
        match self {
            TimeValue::Date(d) => d.and_time(NaiveTime::MIN),
            TimeValue::DateTime { datetime, .. } => *datetime,
        }
    }

    /// YYYYMMDD
    fn date_stamp(&self) -> String {
        format_date(self.date())
    }

    /// YYYYMMDDTHHmm00 (seconds are always dropped)
    fn time_stamp(&self) -> String {
        self.datetime().format("%Y%m%dT%H%M00").to_string()
    }
}

/// A `T` or a space anywhere in the value makes it a date-time.
pub fn is_date_time(input: &str) -> bool {
    input.contains(['T', ' '])
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

fn parse_date_time(input: &str) -> Option<TimeValue> {
    let (local, offset) = split_offset(input)?;
    let local = local.trim();

    let datetime = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())?;

    Some(TimeValue::DateTime { datetime, offset })
}

/// Split a trailing "Z" / "±HH:MM" / "±HHMM" / "±HH" off a date-time.
/// Only signs after the date/time separator count, so the date's own
/// dashes are never mistaken for an offset.
fn split_offset(input: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(local) = input.strip_suffix(['Z', 'z']) {
        return Some((local, FixedOffset::east_opt(0)));
    }

    let separator = input.find(['T', ' '])?;
    match input[separator..].rfind(['+', '-']) {
        Some(i) => {
            let at = separator + i;
            let offset = parse_offset(&input[at..])?;
            Some((&input[..at], Some(offset)))
        }
        None => Some((input, None)),
    }
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, digits) = match text.split_at(1) {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let digits: String = digits.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Render DTSTART. Always produces a line.
pub(crate) fn format_dtstart(
    start: Option<&TimeValue>,
    time_zone: Option<&str>,
    today: NaiveDate,
) -> String {
    match (start, time_zone) {
        // No start at all: today, without a VALUE=DATE parameter
        (None, _) => format!("DTSTART:{}", format_date(today)),
        (Some(start), Some(tz)) => format!("DTSTART;TZID={tz}:{}", start.time_stamp()),
        (Some(start), None) => match start.kind() {
            TimeKind::ZeroOffset => format!("DTSTART:{}", start.time_stamp()),
            // Non-zero offsets are not converted to UTC, only marked with Z
            TimeKind::Unanchored => format!("DTSTART:{}Z", start.time_stamp()),
            TimeKind::Date => format!("DTSTART;VALUE=DATE:{}", start.date_stamp()),
        },
    }
}

/// Render DTEND. Arms are ordered; the first match wins.
///
/// Returns None for an open-ended date-time start that is neither zoned nor
/// at a zero offset. That combination has no rule and gets no DTEND.
pub(crate) fn format_dtend(
    start: Option<&TimeValue>,
    end: Option<&TimeValue>,
    time_zone: Option<&str>,
    time_zone_end: Option<&str>,
    today: NaiveDate,
) -> Option<String> {
    let Some(start) = start else {
        return Some(format!("DTEND:{}", format_date(next_day(today))));
    };

    match (end, time_zone, time_zone_end) {
        (None, Some(tz), None) => Some(format!("DTEND;TZID={tz}:{}", start.time_stamp())),
        (Some(end), Some(tz), None) => Some(format!("DTEND;TZID={tz}:{}", end.time_stamp())),
        (Some(end), Some(_), Some(tz_end)) => {
            Some(format!("DTEND;TZID={tz_end}:{}", end.time_stamp()))
        }
        (Some(end), _, _) => match start.kind() {
            TimeKind::Date => Some(format!("DTEND;VALUE=DATE:{}", end.date_stamp())),
            TimeKind::ZeroOffset | TimeKind::Unanchored => {
                Some(format!("DTEND:{}", end.time_stamp()))
            }
        },
        (None, _, _) => match start.kind() {
            TimeKind::Date => {
                Some(format!(
                    "DTEND;VALUE=DATE:{}",
                    format_date(next_day(start.date()))
                ))
            }
            TimeKind::ZeroOffset => Some(format!("DTEND:{}", start.time_stamp())),
            TimeKind::Unanchored => None,
        },
    }
}

/// The following day, or `date` itself at the end of the representable range.
fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}
