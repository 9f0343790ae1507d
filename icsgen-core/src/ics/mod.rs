//! ICS generation.
//!
//! This module turns event attributes into the restricted iCalendar subset
//! described in RFC 5545: one VCALENDAR holding one VEVENT, optionally
//! preceded by VTIMEZONE definitions. Lines are not folded and text values
//! are written verbatim.

mod alarm;
mod datetime;
mod generate;
mod properties;
pub mod timezone;

pub use datetime::{TimeKind, TimeValue, is_date_time};
pub use generate::{CRLF, Encoder, PRODID, build_event, build_event_lines};
pub use timezone::{Observance, TimezoneTable, TransitionRule, UtcOffset, ZoneDefinition};
