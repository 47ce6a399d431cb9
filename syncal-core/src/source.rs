use async_trait::async_trait;

use crate::event::Event;
use crate::window::SyncWindow;

/// A calendar events are pulled from.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Stable name used in logs (e.g. "google-primary").
    fn name(&self) -> &str;

    /// Fetch all events that start within `window`.
    async fn fetch_events(&self, window: &SyncWindow) -> anyhow::Result<Vec<Event>>;
}
