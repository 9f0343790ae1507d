//! Optional VEVENT properties. Each formatter returns nothing when its
//! source field is absent or unusable.

use tracing::debug;

use crate::event::{Attendee, Geo};

const STATUSES: &[&str] = &["TENTATIVE", "CONFIRMED", "CANCELLED"];

/// `KEY:value`, skipped for empty values.
pub(crate) fn format_property(key: &str, value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| format!("{key}:{v}"))
}

/// STATUS keeps the caller's spelling; only the check is case-insensitive.
pub(crate) fn format_status(status: Option<&str>) -> Option<String> {
    let status = status.filter(|s| !s.is_empty())?;

    if STATUSES.iter().any(|s| s.eq_ignore_ascii_case(status)) {
        Some(format!("STATUS:{status}"))
    } else {
        debug!(status, "Skipping unrecognized STATUS");
        None
    }
}

pub(crate) fn format_geo(geo: Option<&Geo>) -> Option<String> {
    let geo = geo?;
    let (Some(lat), Some(lon)) = (&geo.lat, &geo.lon) else {
        return None;
    };
    if !lat.is_set() || !lon.is_set() {
        return None;
    }

    match (lat.to_f64(), lon.to_f64()) {
        (Some(lat), Some(lon)) => Some(format!("GEO:{lat};{lon}")),
        _ => {
            debug!(?geo, "Skipping non-numeric GEO");
            None
        }
    }
}

pub(crate) fn format_attendees(attendees: &[Attendee]) -> Vec<String> {
    attendees
        .iter()
        .filter_map(|attendee| {
            let name = attendee.name.as_deref().filter(|n| !n.is_empty());
            let email = attendee.email.as_deref().filter(|e| !e.is_empty());
            match (name, email) {
                (Some(name), Some(email)) => Some(format!("ATTENDEE;CN={name}:mailto:{email}")),
                _ => {
                    debug!(?attendee, "Skipping attendee without name and email");
                    None
                }
            }
        })
        .collect()
}

pub(crate) fn format_categories(categories: &[String]) -> Option<String> {
    if categories.is_empty() {
        return None;
    }
    Some(format!("CATEGORIES:{}", categories.join(",")))
}

pub(crate) fn format_attachments(attachments: &[String]) -> Vec<String> {
    attachments
        .iter()
        .filter(|a| !a.is_empty())
        .map(|a| format!("ATTACH:{a}"))
        .collect()
}
