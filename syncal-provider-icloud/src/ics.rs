//! ICS generation for events written to iCloud.

use chrono::DateTime;
use chrono_tz::Tz;
use icalendar::{Calendar, Component, EventLike, Property};
use syncal_core::Event;

const PRODID: &str = "-//syncal//EN";

/// Render an event as a single-VEVENT VCALENDAR document.
pub fn generate_ics(event: &Event) -> String {
    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.title);

    let dtstamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    ics_event.add_property("DTSTAMP", &dtstamp);

    add_datetime_property(&mut ics_event, "DTSTART", &event.start);
    add_datetime_property(&mut ics_event, "DTEND", &event.end);

    if !event.description.is_empty() {
        ics_event.description(&event.description);
    }

    if !event.location.is_empty() {
        ics_event.location(&event.location);
    }

    if !event.organizer.is_empty() {
        let prop = Property::new("ORGANIZER", format!("mailto:{}", event.organizer));
        ics_event.append_property(prop);
    }

    for attendee in event.attendees.iter().filter(|a| !a.is_empty()) {
        let prop = Property::new("ATTENDEE", format!("mailto:{}", attendee));
        ics_event.append_multi_property(prop);
    }

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    rewrite_header(&cal.to_string())
}

/// Set our PRODID and drop CALSCALE:GREGORIAN (it's the default).
fn rewrite_header(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// UTC times use the `Z` form, anything else carries a TZID parameter.
fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, dt: &DateTime<Tz>) {
    let tz = dt.timezone();
    if matches!(tz, Tz::UTC | Tz::Etc__UTC) {
        ics_event.add_property(name, dt.format("%Y%m%dT%H%M%SZ").to_string());
    } else {
        let mut prop = Property::new(name, dt.format("%Y%m%dT%H%M%S").to_string());
        prop.add_parameter("TZID", tz.name());
        ics_event.append_property(prop);
    }
}
