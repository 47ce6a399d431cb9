use async_trait::async_trait;

use crate::event::Event;

/// The calendar events are created in.
#[async_trait]
pub trait EventDestination: Send + Sync {
    fn name(&self) -> &str;

    /// Create `event` remotely, using `event.uid` as its identifier there.
    ///
    /// Callers guarantee the UID is non-empty.
    async fn create_event(&self, event: &Event) -> anyhow::Result<()>;
}
