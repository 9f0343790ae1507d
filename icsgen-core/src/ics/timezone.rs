//! VTIMEZONE definitions keyed by zone identifier.
//!
//! This is a lookup table of hand-written rule blocks, not a timezone
//! engine. Zones missing from the table get no VTIMEZONE, but events may
//! still reference them through TZID.

use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// A UTC offset as written in TZOFFSETFROM/TZOFFSETTO ("-0500").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtcOffset {
    seconds: i32,
}

impl UtcOffset {
    pub fn hours(hours: i32) -> Self {
        UtcOffset {
            seconds: hours * 3600,
        }
    }

    pub fn seconds(seconds: i32) -> Self {
        UtcOffset { seconds }
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.seconds < 0 { '-' } else { '+' };
        let total = self.seconds.abs();
        write!(f, "{sign}{:02}{:02}", total / 3600, (total % 3600) / 60)
    }
}

impl TryFrom<String> for UtcOffset {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let invalid = || format!("Invalid UTC offset '{value}'. Expected e.g. -0500");

        let (sign, rest) = match value.split_at_checked(1) {
            Some(("+", rest)) => (1, rest),
            Some(("-", rest)) => (-1, rest),
            _ => return Err(invalid()),
        };
        let digits = rest.replace(':', "");
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
        let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }
        Ok(UtcOffset::seconds(sign * (hours * 3600 + minutes * 60)))
    }
}

impl From<UtcOffset> for String {
    fn from(value: UtcOffset) -> Self {
        value.to_string()
    }
}

/// Yearly transition on the nth weekday of a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub month: u32,
    /// 1 = first, 2 = second, ..., -1 = last
    pub week: i8,
    pub weekday: Weekday,
}

impl TransitionRule {
    fn rrule(&self) -> String {
        format!(
            "RRULE:FREQ=YEARLY;BYMONTH={};BYDAY={}{}",
            self.month,
            self.week,
            weekday_code(self.weekday)
        )
    }
}

/// One STANDARD or DAYLIGHT sub-component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observance {
    /// First onset, in local time before the transition
    pub start: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<TransitionRule>,
    pub offset_from: UtcOffset,
    pub offset_to: UtcOffset,
    pub name: String,
}

impl Observance {
    fn push_lines(&self, kind: &str, lines: &mut Vec<String>) {
        lines.push(format!("BEGIN:{kind}"));
        lines.push(format!("DTSTART:{}", self.start.format("%Y%m%dT%H%M%S")));
        if let Some(ref rule) = self.rule {
            lines.push(rule.rrule());
        }
        lines.push(format!("TZOFFSETFROM:{}", self.offset_from));
        lines.push(format!("TZOFFSETTO:{}", self.offset_to));
        lines.push(format!("TZNAME:{}", self.name));
        lines.push(format!("END:{kind}"));
    }
}

/// A complete VTIMEZONE block for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    pub tzid: String,
    pub standard: Observance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daylight: Option<Observance>,
}

impl ZoneDefinition {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec!["BEGIN:VTIMEZONE".to_string(), format!("TZID:{}", self.tzid)];
        self.standard.push_lines("STANDARD", &mut lines);
        if let Some(ref daylight) = self.daylight {
            daylight.push_lines("DAYLIGHT", &mut lines);
        }
        lines.push("END:VTIMEZONE".to_string());
        lines
    }

    /// US Eastern time, with the 2007 DST rules.
    pub fn america_new_york() -> Self {
        ZoneDefinition {
            tzid: "America/New_York".to_string(),
            standard: Observance {
                start: onset(2007, 11, 4),
                rule: Some(TransitionRule {
                    month: 11,
                    week: 1,
                    weekday: Weekday::Sun,
                }),
                offset_from: UtcOffset::hours(-4),
                offset_to: UtcOffset::hours(-5),
                name: "EST".to_string(),
            },
            daylight: Some(Observance {
                start: onset(2007, 3, 11),
                rule: Some(TransitionRule {
                    month: 3,
                    week: 2,
                    weekday: Weekday::Sun,
                }),
                offset_from: UtcOffset::hours(-5),
                offset_to: UtcOffset::hours(-4),
                name: "EDT".to_string(),
            }),
        }
    }
}

/// 02:00 local on the given day. Only called with literal, valid dates.
fn onset(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(2, 0, 0))
        .unwrap_or_default()
}

fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// Zone identifier -> VTIMEZONE definition.
#[derive(Debug, Clone)]
pub struct TimezoneTable {
    zones: HashMap<String, ZoneDefinition>,
}

impl Default for TimezoneTable {
    /// The built-in zones.
    fn default() -> Self {
        let mut table = TimezoneTable::empty();
        table.register(ZoneDefinition::america_new_york());
        table
    }
}

impl TimezoneTable {
    pub fn empty() -> Self {
        TimezoneTable {
            zones: HashMap::new(),
        }
    }

    /// Add a zone, replacing any existing definition with the same TZID.
    pub fn register(&mut self, zone: ZoneDefinition) {
        self.zones.insert(zone.tzid.clone(), zone);
    }

    pub fn get(&self, tzid: &str) -> Option<&ZoneDefinition> {
        self.zones.get(tzid)
    }

    pub fn contains(&self, tzid: &str) -> bool {
        self.zones.contains_key(tzid)
    }
}

impl Extend<ZoneDefinition> for TimezoneTable {
    fn extend<T: IntoIterator<Item = ZoneDefinition>>(&mut self, iter: T) {
        for zone in iter {
            self.register(zone);
        }
    }
}
