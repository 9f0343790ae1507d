//! ICS document assembly.

use std::sync::Arc;

use tracing::{debug, warn};

use super::alarm::format_alarms;
use super::datetime::{TimeValue, format_dtend, format_dtstart};
use super::properties::{
    format_attachments, format_attendees, format_categories, format_geo, format_property,
    format_status,
};
use super::timezone::TimezoneTable;
use crate::event::EventAttributes;
use crate::source::{Clock, SystemClock, UidSource, UuidSource};

/// Line terminator mandated by RFC 5545.
pub const CRLF: &str = "\r\n";

pub const PRODID: &str = "-//icsgen//icsgen//EN";

/// Turns `EventAttributes` into iCalendar text.
///
/// Cheap to clone and safe to share between threads. Each call reads one
/// UID and the current time from the configured sources.
#[derive(Clone)]
pub struct Encoder {
    uids: Arc<dyn UidSource>,
    clock: Arc<dyn Clock>,
    timezones: TimezoneTable,
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder {
            uids: Arc::new(UuidSource),
            clock: Arc::new(SystemClock),
            timezones: TimezoneTable::default(),
        }
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uid_source(mut self, uids: impl UidSource + 'static) -> Self {
        self.uids = Arc::new(uids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_timezones(mut self, timezones: TimezoneTable) -> Self {
        self.timezones = timezones;
        self
    }

    /// Encode to a single CRLF-joined string (no trailing terminator).
    pub fn encode(&self, attributes: Option<&EventAttributes>) -> String {
        self.encode_lines(attributes).join(CRLF)
    }

    /// Encode to the individual content lines.
    ///
    /// Missing or empty attributes give the minimal default event.
    pub fn encode_lines(&self, attributes: Option<&EventAttributes>) -> Vec<String> {
        match attributes.filter(|a| !a.is_empty()) {
            Some(attributes) => self.event_lines(attributes),
            None => self.default_event_lines(),
        }
    }

    fn default_event_lines(&self) -> Vec<String> {
        let mut lines = calendar_header();
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(self.uid_line());
        lines.push(self.dtstamp_line());
        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());
        lines
    }

    fn event_lines(&self, attrs: &EventAttributes) -> Vec<String> {
        let today = self.clock.today();
        let time_zone = non_empty(&attrs.time_zone);
        let time_zone_end = non_empty(&attrs.time_zone_end);
        let start = parse_time("start", non_empty(&attrs.start));
        let end = parse_time("end", non_empty(&attrs.end));

        let mut lines = calendar_header();

        if let Some(zone) = time_zone.and_then(|tz| self.timezones.get(tz)) {
            lines.extend(zone.lines());
        }

        lines.push("BEGIN:VEVENT".to_string());
        lines.push(self.uid_line());
        lines.push(self.dtstamp_line());
        lines.push(format_dtstart(start.as_ref(), time_zone, today));

        let single_valued = [
            format_dtend(
                start.as_ref(),
                end.as_ref(),
                time_zone,
                time_zone_end,
                today,
            ),
            format_property("SUMMARY", attrs.title.as_deref()),
            format_property("DESCRIPTION", attrs.description.as_deref()),
            format_property("LOCATION", attrs.location.as_deref()),
            format_property("URL", attrs.url.as_deref()),
            format_status(attrs.status.as_deref()),
            format_geo(attrs.geo.as_ref()),
        ];
        lines.extend(single_valued.into_iter().flatten());

        lines.extend(format_attendees(
            attrs.attendees.as_deref().unwrap_or_default(),
        ));
        lines.extend(format_categories(
            attrs.categories.as_deref().unwrap_or_default(),
        ));
        lines.extend(format_attachments(
            attrs.attachments.as_deref().unwrap_or_default(),
        ));
        lines.extend(format_alarms(attrs.alarms.as_deref().unwrap_or_default()));

        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        debug!(lines = lines.len(), "Encoded event");
        lines
    }

    fn uid_line(&self) -> String {
        format!("UID:{}", self.uids.next_uid())
    }

    fn dtstamp_line(&self) -> String {
        format!("DTSTAMP:{}", self.clock.now().format("%Y%m%dT%H%M%SZ"))
    }
}

/// Encode with a random UID and the system clock.
pub fn build_event(attributes: Option<&EventAttributes>) -> String {
    Encoder::default().encode(attributes)
}

/// Like `build_event`, returning the individual lines.
pub fn build_event_lines(attributes: Option<&EventAttributes>) -> Vec<String> {
    Encoder::default().encode_lines(attributes)
}

fn calendar_header() -> Vec<String> {
    vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
        format!("PRODID:{PRODID}"),
    ]
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Unparseable values are treated as if they were never supplied.
fn parse_time(field: &str, value: Option<&str>) -> Option<TimeValue> {
    let value = value?;
    let parsed = TimeValue::parse(value);
    if parsed.is_none() {
        warn!(field, value, "Ignoring unparseable date");
    }
    parsed
}
