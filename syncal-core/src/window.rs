//! Time window a sync cycle fetches events for.

use chrono::{DateTime, Duration, Utc};

/// Forward-looking range of time, `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl SyncWindow {
    /// Window starting now and reaching `days` ahead.
    pub fn forward(days: u32) -> Self {
        Self::forward_from(Utc::now(), days)
    }

    /// The end is clamped to the latest representable instant.
    pub fn forward_from(now: DateTime<Utc>, days: u32) -> Self {
        let to = now
            .checked_add_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        SyncWindow { from: now, to }
    }

    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339()
    }

    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339()
    }
}
