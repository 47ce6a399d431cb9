use chrono_tz::Tz;
use syncal_core::Event;

/// Convert a Google event into a syncal `Event`.
///
/// Returns `None` for events that cannot be synced: cancelled items and
/// all-day events, which carry a date but no precise start/end timestamp.
pub fn from_google(event: google_calendar::types::Event, source: &str) -> Option<Event> {
    if event.status == "cancelled" || event.id.is_empty() {
        return None;
    }

    let start = event.start.as_ref().and_then(|s| s.date_time)?;
    let end = event.end.as_ref().and_then(|e| e.date_time)?;

    let organizer = event
        .organizer
        .as_ref()
        .map(|o| o.email.clone())
        .unwrap_or_default();

    let attendees = event
        .attendees
        .iter()
        .map(|a| a.email.clone())
        .filter(|email| !email.is_empty())
        .collect();

    Some(Event {
        id: event.id,
        title: event.summary,
        description: event.description,
        start: start.with_timezone(&Tz::UTC),
        end: end.with_timezone(&Tz::UTC),
        location: event.location,
        organizer,
        attendees,
        source: source.to_string(),
        uid: event.i_cal_uid,
    })
}
