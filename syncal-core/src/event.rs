//! Provider-neutral event model.
//!
//! Sources convert their API responses into `Event`s and the destination
//! turns them back into its own format. Nothing here outlives a single
//! fetch: events are rebuilt from the source on every cycle.

use chrono::DateTime;
use chrono_tz::Tz;

/// A calendar event (provider-neutral)
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Identifier assigned by the source provider; the dedup key
    pub id: String,
    pub title: String,
    pub description: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub location: String,
    /// Organizer email
    pub organizer: String,
    /// Attendee emails, in the order the source returned them
    pub attendees: Vec<String>,
    /// Which account/calendar produced the event (e.g. "google-primary")
    pub source: String,
    /// iCalendar UID shared across providers; empty when the source had none
    pub uid: String,
}

impl Event {
    pub fn has_uid(&self) -> bool {
        !self.uid.trim().is_empty()
    }

    /// Fill in a freshly generated UID if the event has none.
    ///
    /// Returns `true` when a new UID was assigned.
    pub fn ensure_uid(&mut self) -> bool {
        if self.has_uid() {
            return false;
        }
        self.uid = generate_uid();
        true
    }

    /// Express start and end in `tz`. The instants themselves do not move.
    pub fn to_timezone(&mut self, tz: Tz) {
        self.start = self.start.with_timezone(&tz);
        self.end = self.end.with_timezone(&tz);
    }
}

/// Generate a globally unique identifier for an event.
pub fn generate_uid() -> String {
    uuid::Uuid::new_v4().to_string()
}
