//! VALARM blocks.

use tracing::debug;

use crate::event::{Alarm, AlarmAction};

/// Used for every alarm; supplied triggers are not interpreted yet.
const DEFAULT_TRIGGER: &str = "TRIGGER:-PT15M";

/// Lines for every alarm that produces output, in input order.
pub(crate) fn format_alarms(alarms: &[Alarm]) -> Vec<String> {
    alarms
        .iter()
        .filter_map(format_alarm)
        .flatten()
        .collect()
}

fn format_alarm(alarm: &Alarm) -> Option<Vec<String>> {
    let action = match alarm.action {
        AlarmAction::Display => display_action(alarm)?,
        AlarmAction::Audio | AlarmAction::Email => {
            debug!(action = ?alarm.action, "Skipping alarm with unsupported action");
            return None;
        }
        AlarmAction::Unknown => {
            debug!("Skipping alarm with unrecognized action");
            return None;
        }
    };

    // TODO: interpret `alarm.trigger` (relative durations and absolute times)
    let mut lines = vec!["BEGIN:VALARM".to_string(), DEFAULT_TRIGGER.to_string()];
    lines.extend(action);
    lines.push("END:VALARM".to_string());
    Some(lines)
}

fn display_action(alarm: &Alarm) -> Option<Vec<String>> {
    let Some(description) = alarm.description.as_deref().filter(|d| !d.is_empty()) else {
        debug!("Skipping display alarm without description");
        return None;
    };

    // DURATION and REPEAT are only valid as a pair; neither is written yet.
    if alarm.duration.is_some() && alarm.repeat.is_some() {
        debug!("Alarm DURATION/REPEAT are not emitted");
    }

    Some(vec![
        "ACTION:DISPLAY".to_string(),
        format!("DESCRIPTION:{description}"),
    ])
}
