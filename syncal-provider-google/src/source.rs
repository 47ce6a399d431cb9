use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use google_calendar::types::OrderBy;
use syncal_core::{Event, EventSource, SyncWindow};
use tracing::{debug, info};

use crate::app_config::GoogleCredentials;
use crate::convert::from_google;
use crate::session::Session;

/// One calendar of one Google account.
pub struct GoogleSource {
    name: String,
    account: String,
    calendar_id: String,
    sessions_dir: PathBuf,
    credentials: GoogleCredentials,
}

impl GoogleSource {
    pub fn new(
        account: impl Into<String>,
        calendar_id: impl Into<String>,
        sessions_dir: impl Into<PathBuf>,
        credentials: GoogleCredentials,
    ) -> Self {
        let calendar_id = calendar_id.into();
        GoogleSource {
            name: format!("google-{}", calendar_id),
            account: account.into(),
            calendar_id,
            sessions_dir: sessions_dir.into(),
            credentials,
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }
}

#[async_trait]
impl EventSource for GoogleSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_events(&self, window: &SyncWindow) -> Result<Vec<Event>> {
        debug!(account = %self.account, calendar_id = %self.calendar_id, "Fetching upcoming events");

        let session =
            Session::load_valid(&self.sessions_dir, &self.account, &self.credentials).await?;
        let client = session.client(&self.credentials);

        let time_min = window.from_rfc3339();
        let time_max = window.to_rfc3339();

        let response = client
            .events()
            .list_all(
                &self.calendar_id,
                "",
                0,
                OrderBy::StartTime,
                &[],
                "", // search query
                &[],
                false, // show_deleted
                false,
                true, // single_events: recurring events come back as instances
                &time_max,
                &time_min,
                "",
                "",
            )
            .await
            .with_context(|| format!("Failed to fetch events from {}", self.calendar_id))?;

        let total = response.body.len();
        let events: Vec<Event> = response
            .body
            .into_iter()
            .filter_map(|e| from_google(e, &self.name))
            .collect();

        info!(
            calendar_id = %self.calendar_id,
            count = events.len(),
            dropped = total - events.len(),
            "Fetched events from Google Calendar"
        );

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_is_named_after_calendar() {
        let creds = GoogleCredentials::new("id", "secret").unwrap();
        let source = GoogleSource::new("me@example.com", "primary", "/tmp/sessions", creds);

        assert_eq!(source.name(), "google-primary");
        assert_eq!(source.account(), "me@example.com");
        assert_eq!(source.calendar_id(), "primary");
    }

    #[tokio::test]
    async fn test_fetch_without_session_fails() {
        let dir = tempfile::tempdir().unwrap();
        let creds = GoogleCredentials::new("id", "secret").unwrap();
        let source = GoogleSource::new("me@example.com", "primary", dir.path(), creds);

        let result = source.fetch_events(&SyncWindow::forward(7)).await;
        assert!(result.is_err());
    }
}
