use chrono::{TimeZone, Utc};
use icalendar::{CalendarComponent, Component};
use icsgen_core::source::{FixedClock, FixedUid};
use icsgen_core::{Alarm, AlarmAction, Attendee, Encoder, EventAttributes, Geo};

fn encoder() -> Encoder {
    Encoder::new()
        .with_uid_source(FixedUid("golden-uid".to_string()))
        .with_clock(FixedClock(
            Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
        ))
}

fn encode(attrs: &EventAttributes) -> String {
    encoder().encode(Some(attrs))
}

fn lines(ics: &str) -> Vec<&str> {
    ics.split("\r\n").collect()
}

fn count(ics: &str, line: &str) -> usize {
    lines(ics).iter().filter(|l| **l == line).count()
}

fn starting_with<'a>(ics: &'a str, prefix: &str) -> Vec<&'a str> {
    lines(ics)
        .into_iter()
        .filter(|l| l.starts_with(prefix))
        .collect()
}

fn sample_inputs() -> Vec<EventAttributes> {
    vec![
        EventAttributes::default(),
        EventAttributes {
            title: Some("All day".to_string()),
            start: Some("2024-06-01".to_string()),
            ..Default::default()
        },
        EventAttributes {
            start: Some("2024-06-01T10:00:00".to_string()),
            time_zone: Some("America/New_York".to_string()),
            alarms: Some(vec![Alarm::display("Go"), Alarm::display("Again")]),
            ..Default::default()
        },
        EventAttributes {
            start: Some("2024-06-01T10:00:00+02:00".to_string()),
            attendees: Some(vec![Attendee::new("Ann", "a@x.com")]),
            ..Default::default()
        },
    ]
}

#[test]
fn test_exactly_one_calendar_and_event_block() {
    for attrs in sample_inputs() {
        let ics = encode(&attrs);
        let all = lines(&ics);

        assert_eq!(count(&ics, "BEGIN:VCALENDAR"), 1, "{ics}");
        assert_eq!(count(&ics, "END:VCALENDAR"), 1, "{ics}");
        assert_eq!(count(&ics, "BEGIN:VEVENT"), 1, "{ics}");
        assert_eq!(count(&ics, "END:VEVENT"), 1, "{ics}");

        assert_eq!(all.first(), Some(&"BEGIN:VCALENDAR"));
        assert_eq!(all.last(), Some(&"END:VCALENDAR"));
        let begin = all.iter().position(|l| *l == "BEGIN:VEVENT").unwrap();
        let end = all.iter().position(|l| *l == "END:VEVENT").unwrap();
        assert!(begin < end);
        assert_eq!(end, all.len() - 2, "VEVENT must close right before VCALENDAR");
    }
}

#[test]
fn test_empty_attributes_give_default_document() {
    let expected = "BEGIN:VCALENDAR\r\n\
                    VERSION:2.0\r\n\
                    CALSCALE:GREGORIAN\r\n\
                    PRODID:-//icsgen//icsgen//EN\r\n\
                    BEGIN:VEVENT\r\n\
                    UID:golden-uid\r\n\
                    DTSTAMP:20240315T120000Z\r\n\
                    END:VEVENT\r\n\
                    END:VCALENDAR";

    assert_eq!(encoder().encode(None), expected);
    assert_eq!(encode(&EventAttributes::default()), expected);
}

#[test]
fn test_date_only_start() {
    let ics = encode(&EventAttributes {
        start: Some("2024-06-01".to_string()),
        ..Default::default()
    });

    assert_eq!(count(&ics, "DTSTART;VALUE=DATE:20240601"), 1, "{ics}");
    assert_eq!(count(&ics, "DTEND;VALUE=DATE:20240602"), 1, "{ics}");
}

#[test]
fn test_floating_date_time_start_is_z_suffixed() {
    let ics = encode(&EventAttributes {
        start: Some("2024-06-01T10:00:00".to_string()),
        ..Default::default()
    });

    assert_eq!(count(&ics, "DTSTART:20240601T100000Z"), 1, "{ics}");
    // Open-ended, unanchored start: no DTEND is written
    assert!(starting_with(&ics, "DTEND").is_empty(), "{ics}");
}

#[test]
fn test_new_york_timezone() {
    let ics = encode(&EventAttributes {
        start: Some("2024-06-01T10:00:00".to_string()),
        end: Some("2024-06-01T11:30:00".to_string()),
        time_zone: Some("America/New_York".to_string()),
        ..Default::default()
    });
    let all = lines(&ics);

    assert_eq!(count(&ics, "BEGIN:VTIMEZONE"), 1, "{ics}");
    assert_eq!(count(&ics, "TZID:America/New_York"), 1, "{ics}");
    let tz_end = all.iter().position(|l| *l == "END:VTIMEZONE").unwrap();
    let event = all.iter().position(|l| *l == "BEGIN:VEVENT").unwrap();
    assert!(tz_end < event, "VTIMEZONE must precede the event:\n{ics}");

    assert_eq!(
        count(&ics, "DTSTART;TZID=America/New_York:20240601T100000"),
        1,
        "{ics}"
    );
    assert_eq!(
        count(&ics, "DTEND;TZID=America/New_York:20240601T113000"),
        1,
        "{ics}"
    );
}

#[test]
fn test_unknown_timezone_has_tzid_but_no_block() {
    let ics = encode(&EventAttributes {
        start: Some("2024-06-01T10:00:00".to_string()),
        time_zone: Some("Mars/Olympus_Mons".to_string()),
        ..Default::default()
    });

    assert!(!ics.contains("VTIMEZONE"), "{ics}");
    assert_eq!(
        starting_with(&ics, "DTSTART"),
        vec!["DTSTART;TZID=Mars/Olympus_Mons:20240601T100000"]
    );
    assert_eq!(
        starting_with(&ics, "DTEND"),
        vec!["DTEND;TZID=Mars/Olympus_Mons:20240601T100000"]
    );
}

#[test]
fn test_attendees() {
    let ics = encode(&EventAttributes {
        attendees: Some(vec![
            Attendee {
                name: Some("Ann".to_string()),
                email: None,
            },
            Attendee::new("Ann", "a@x.com"),
        ]),
        ..Default::default()
    });

    assert_eq!(
        starting_with(&ics, "ATTENDEE"),
        vec!["ATTENDEE;CN=Ann:mailto:a@x.com"]
    );
}

#[test]
fn test_status() {
    let with_status = |status: &str| {
        encode(&EventAttributes {
            status: Some(status.to_string()),
            ..Default::default()
        })
    };

    assert_eq!(
        starting_with(&with_status("confirmed"), "STATUS"),
        vec!["STATUS:confirmed"]
    );
    assert!(starting_with(&with_status("maybe"), "STATUS").is_empty());
}

#[test]
fn test_display_alarm_requires_description() {
    let without = encode(&EventAttributes {
        alarms: Some(vec![Alarm::new(AlarmAction::Display)]),
        ..Default::default()
    });
    assert!(!without.contains("VALARM"), "{without}");

    let with = encode(&EventAttributes {
        alarms: Some(vec![Alarm {
            trigger: Some("-PT2H".into()),
            ..Alarm::display("Pack bags")
        }]),
        ..Default::default()
    });
    assert_eq!(count(&with, "BEGIN:VALARM"), 1, "{with}");
    assert_eq!(starting_with(&with, "TRIGGER"), vec!["TRIGGER:-PT15M"]);
    assert_eq!(count(&with, "DESCRIPTION:Pack bags"), 1, "{with}");
}

#[test]
fn test_fixed_sources_are_byte_stable() {
    for attrs in sample_inputs() {
        assert_eq!(encode(&attrs), encode(&attrs));
    }
}

#[test]
fn test_full_event_golden() {
    let attrs = EventAttributes {
        title: Some("Offsite".to_string()),
        description: Some("Planning day".to_string()),
        location: Some("Lakeside".to_string()),
        url: Some("https://example.com/offsite".to_string()),
        start: Some("2024-09-10".to_string()),
        end: Some("2024-09-12".to_string()),
        status: Some("Tentative".to_string()),
        geo: Some(Geo::new("46.2", 6.15)),
        categories: Some(vec!["team".to_string(), "travel".to_string()]),
        attachments: Some(vec!["https://example.com/agenda.pdf".to_string()]),
        attendees: Some(vec![
            Attendee::new("Ann", "ann@example.com"),
            Attendee::new("Bo", "bo@example.com"),
        ]),
        alarms: Some(vec![Alarm::display("Offsite tomorrow")]),
        ..Default::default()
    };

    let expected = [
        "BEGIN:VCALENDAR",
        "VERSION:2.0",
        "CALSCALE:GREGORIAN",
        "PRODID:-//icsgen//icsgen//EN",
        "BEGIN:VEVENT",
        "UID:golden-uid",
        "DTSTAMP:20240315T120000Z",
        "DTSTART;VALUE=DATE:20240910",
        "DTEND;VALUE=DATE:20240912",
        "SUMMARY:Offsite",
        "DESCRIPTION:Planning day",
        "LOCATION:Lakeside",
        "URL:https://example.com/offsite",
        "STATUS:Tentative",
        "GEO:46.2;6.15",
        "ATTENDEE;CN=Ann:mailto:ann@example.com",
        "ATTENDEE;CN=Bo:mailto:bo@example.com",
        "CATEGORIES:team,travel",
        "ATTACH:https://example.com/agenda.pdf",
        "BEGIN:VALARM",
        "TRIGGER:-PT15M",
        "ACTION:DISPLAY",
        "DESCRIPTION:Offsite tomorrow",
        "END:VALARM",
        "END:VEVENT",
        "END:VCALENDAR",
    ]
    .join("\r\n");

    assert_eq!(encode(&attrs), expected);
}

#[test]
fn test_output_parses_as_icalendar() {
    let ics = encode(&EventAttributes {
        title: Some("Parsed".to_string()),
        start: Some("2024-06-01T10:00:00Z".to_string()),
        end: Some("2024-06-01T11:00:00Z".to_string()),
        location: Some("Hall".to_string()),
        attendees: Some(vec![Attendee::new("Ann", "a@x.com")]),
        ..Default::default()
    });

    let calendar: icalendar::Calendar = ics.parse().expect("generated ICS should parse");
    let events: Vec<_> = calendar
        .components
        .iter()
        .filter_map(|c| match c {
            CalendarComponent::Event(event) => Some(event),
            _ => None,
        })
        .collect();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].get_summary(), Some("Parsed"));
}
