//! Unique identifiers and the current time, as injectable sources.
//!
//! The encoder reads both exactly once per document. Swapping in `FixedUid`
//! and `FixedClock` makes output byte-stable for golden tests.

use chrono::{DateTime, Local, NaiveDate, Utc};
use uuid::Uuid;

/// Produces the value of the UID property.
pub trait UidSource: Send + Sync {
    fn next_uid(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl UidSource for UuidSource {
    fn next_uid(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Always returns the same identifier.
#[derive(Debug, Clone)]
pub struct FixedUid(pub String);

impl UidSource for FixedUid {
    fn next_uid(&self) -> String {
        self.0.clone()
    }
}

/// Source of "now" for DTSTAMP and "today" for undated events.
pub trait Clock: Send + Sync {
    /// Current instant, rendered as DTSTAMP.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date, used when an event has no start.
    fn today(&self) -> NaiveDate;
}

/// Wall clock. `today` follows the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen at one instant; `today` is that instant's UTC date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }

    fn today(&self) -> NaiveDate {
        self.0.date_naive()
    }
}
