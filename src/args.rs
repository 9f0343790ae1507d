//! Event flags shared by `new` and `show`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::Args;
use icsgen_core::{Alarm, Attendee, EventAttributes, Geo};
use tracing::warn;

#[derive(Args, Debug, Default)]
pub struct EventArgs {
    /// Read attributes from a .json or .toml file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Event title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Start date or date-time (e.g., "2025-03-20" or "2025-03-20T15:00")
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date or date-time
    #[arg(short, long)]
    pub end: Option<String>,

    /// IANA timezone for the start (e.g., "America/New_York")
    #[arg(long = "tz", value_name = "TZID")]
    pub time_zone: Option<String>,

    /// IANA timezone for the end, if different from the start
    #[arg(long = "tz-end", value_name = "TZID")]
    pub time_zone_end: Option<String>,

    /// Event description
    #[arg(long)]
    pub description: Option<String>,

    /// Event location
    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    /// TENTATIVE, CONFIRMED or CANCELLED
    #[arg(long)]
    pub status: Option<String>,

    /// Coordinates as "LAT,LON"
    #[arg(long, value_name = "LAT,LON", value_parser = parse_geo)]
    pub geo: Option<Geo>,

    /// Attendee as "Name <email>" (repeatable)
    #[arg(long = "attendee", value_name = "NAME <EMAIL>", value_parser = parse_attendee)]
    pub attendees: Vec<Attendee>,

    /// Category (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Attachment URI (repeatable)
    #[arg(long = "attach", value_name = "URI")]
    pub attachments: Vec<String>,

    /// Add a display reminder with this text (repeatable)
    #[arg(long = "alarm", value_name = "TEXT")]
    pub alarms: Vec<String>,
}

impl EventArgs {
    /// Merge the flags over the `--from` file (if any).
    pub fn into_attributes(self) -> Result<EventAttributes> {
        let mut attributes = match self.from {
            Some(ref path) => EventAttributes::from_path(path)
                .with_context(|| format!("Could not read event from {}", path.display()))?,
            None => EventAttributes::default(),
        };

        overlay(&mut attributes.title, self.title);
        overlay(&mut attributes.start, self.start);
        overlay(&mut attributes.end, self.end);
        overlay(&mut attributes.time_zone, self.time_zone);
        overlay(&mut attributes.time_zone_end, self.time_zone_end);
        overlay(&mut attributes.description, self.description);
        overlay(&mut attributes.location, self.location);
        overlay(&mut attributes.url, self.url);
        overlay(&mut attributes.status, self.status);
        overlay(&mut attributes.geo, self.geo);
        overlay_list(&mut attributes.attendees, self.attendees);
        overlay_list(&mut attributes.categories, self.categories);
        overlay_list(&mut attributes.attachments, self.attachments);
        overlay_list(
            &mut attributes.alarms,
            self.alarms.into_iter().map(Alarm::display).collect(),
        );

        warn_unknown_zones(&attributes);

        Ok(attributes)
    }
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn overlay_list<T>(slot: &mut Option<Vec<T>>, values: Vec<T>) {
    if !values.is_empty() {
        *slot = Some(values);
    }
}

/// Zones chrono-tz doesn't know are still written as TZID, so only warn.
fn warn_unknown_zones(attributes: &EventAttributes) {
    let zones = [&attributes.time_zone, &attributes.time_zone_end];
    for tzid in zones.into_iter().flatten() {
        if tzid.parse::<Tz>().is_err() {
            warn!(tzid = %tzid, "Unknown IANA timezone");
        }
    }
}

fn parse_geo(input: &str) -> Result<Geo, String> {
    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| format!("expected \"LAT,LON\", got \"{input}\""))?;

    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("\"{}\" is not a number", value.trim()))
    };

    Ok(Geo::new(parse(lat)?, parse(lon)?))
}

fn parse_attendee(input: &str) -> Result<Attendee, String> {
    let err = || format!("expected \"Name <email>\", got \"{input}\"");

    let (name, rest) = input.split_once('<').ok_or_else(err)?;
    let email = rest.strip_suffix('>').ok_or_else(err)?.trim();
    let name = name.trim();

    if name.is_empty() || email.is_empty() {
        return Err(err());
    }

    Ok(Attendee::new(name, email))
}
