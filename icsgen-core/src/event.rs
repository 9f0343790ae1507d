//! Input types describing a single calendar event.
//!
//! These mirror the loosely-typed attribute record callers hand to the
//! encoder: every field is optional, and sub-structures that are only
//! partially filled in are dropped at encode time rather than rejected here.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IcsError, IcsResult};

/// Everything the encoder knows about an event.
///
/// `start`/`end` are kept as text on purpose: their lexical shape (date vs
/// date-time, explicit offset or not) decides how DTSTART/DTEND are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// "2024-06-01", "2024-06-01T10:00", "2024-06-01 10:00:00+02:00", ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    /// IANA zone for `start` (and `end`, unless `time_zone_end` is set)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone_end: Option<String>,

    /// TENTATIVE, CONFIRMED or CANCELLED in any case
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<Attendee>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarms: Option<Vec<Alarm>>,
}

impl EventAttributes {
    /// True when no field at all was supplied.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Load attributes from a `.json` or `.toml` file.
    pub fn from_path(path: &Path) -> IcsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| IcsError::Serialization(format!("{}: {e}", path.display()))),
            Some("toml") => toml::from_str(&content)
                .map_err(|e| IcsError::Serialization(format!("{}: {e}", path.display()))),
            _ => Err(IcsError::Serialization(format!(
                "Unsupported attributes file '{}'. Expected .json or .toml",
                path.display()
            ))),
        }
    }
}

/// An event attendee. Both fields are needed for an ATTENDEE line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attendee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Attendee {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Attendee {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }
}

/// Geographic position of the event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<Coordinate>,
}

impl Geo {
    pub fn new(lat: impl Into<Coordinate>, lon: impl Into<Coordinate>) -> Self {
        Geo {
            lat: Some(lat.into()),
            lon: Some(lon.into()),
        }
    }
}

/// A latitude or longitude, given either as a number or as numeric text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    /// Zero, NaN and empty text count as "not supplied".
    pub fn is_set(&self) -> bool {
        match self {
            Coordinate::Number(n) => *n != 0.0 && !n.is_nan(),
            Coordinate::Text(s) => !s.is_empty(),
        }
    }

    /// Numeric value, reading text the way a lenient float parser would:
    /// leading whitespace is skipped and trailing garbage ignored ("12.5deg").
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            Coordinate::Number(n) => *n,
            Coordinate::Text(s) => leading_float(s)?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Coordinate::Number(value)
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Coordinate::Text(value.to_string())
    }
}

impl From<String> for Coordinate {
    fn from(value: String) -> Self {
        Coordinate::Text(value)
    }
}

/// Longest numeric prefix of `s`, found in one pass and parsed once.
///
/// Accepts an optional sign, digits with at most one decimal point, and an
/// exponent only when at least one digit follows it.
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let mantissa_start = end;
    let mut seen_point = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_point => {
                seen_point = true;
                end += 1;
            }
            _ => break,
        }
    }
    if !s[mantissa_start..end].bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// What an alarm does when it fires. Missing or unrecognized actions are
/// `Unknown`, and such alarms are dropped at encode time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmAction {
    Audio,
    Display,
    Email,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A reminder attached to the event (VALARM).
///
/// `trigger`, `duration` and `repeat` are carried through untyped: they are
/// accepted in any shape but not written out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    #[serde(default)]
    pub action: AlarmAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Time between repeats, e.g. "PT5M"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Value>,
}

impl Alarm {
    pub fn new(action: AlarmAction) -> Self {
        Alarm {
            action,
            description: None,
            duration: None,
            repeat: None,
            trigger: None,
        }
    }

    /// A display alarm showing `description`.
    pub fn display(description: impl Into<String>) -> Self {
        Alarm {
            description: Some(description.into()),
            ..Alarm::new(AlarmAction::Display)
        }
    }
}
