//! iCloud calendar as an `EventDestination`.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use async_trait::async_trait;
use libdav::dav::{PutResource, mime_types};
use syncal_core::{Event, EventDestination};

use crate::caldav::{ICloudCalDavClient, create_caldav_client, event_url, url_to_href};
use crate::discovery::Discovery;
use crate::ics::generate_ics;

pub const CALDAV_ENDPOINT: &str = "https://caldav.icloud.com/";

/// One iCloud calendar collection, resolved once at connect time.
pub struct ICloudDestination {
    name: String,
    calendar_url: String,
    username: String,
    app_password: String,
    /// Built on first use and shared by every write
    caldav: OnceLock<ICloudCalDavClient>,
}

impl ICloudDestination {
    /// Log in and look up the calendar named `calendar_name`.
    ///
    /// Fails if the credentials are rejected or no calendar has that
    /// display name.
    pub async fn connect(username: &str, app_password: &str, calendar_name: &str) -> Result<Self> {
        Self::connect_to(CALDAV_ENDPOINT, username, app_password, calendar_name).await
    }

    /// Same as [`connect`](Self::connect) against a different CalDAV endpoint.
    pub async fn connect_to(
        endpoint: &str,
        username: &str,
        app_password: &str,
        calendar_name: &str,
    ) -> Result<Self> {
        if username.trim().is_empty() || app_password.trim().is_empty() {
            anyhow::bail!("iCloud username and app-specific password are required");
        }

        let discovery = Discovery::new(username, app_password)?;
        let calendar_url = discovery
            .find_calendar(endpoint, calendar_name)
            .await
            .with_context(|| format!("Failed to resolve iCloud calendar '{}'", calendar_name))?;

        tracing::info!(calendar = calendar_name, url = %calendar_url, "Connected to iCloud calendar");

        let destination =
            Self::with_calendar_url(calendar_name, &calendar_url, username, app_password);
        destination.caldav()?;
        Ok(destination)
    }

    /// Build a destination for an already known calendar URL.
    pub fn with_calendar_url(
        calendar_name: &str,
        calendar_url: &str,
        username: &str,
        app_password: &str,
    ) -> Self {
        Self {
            name: format!("icloud-{}", calendar_name),
            calendar_url: calendar_url.to_string(),
            username: username.to_string(),
            app_password: app_password.to_string(),
            caldav: OnceLock::new(),
        }
    }

    pub fn calendar_url(&self) -> &str {
        &self.calendar_url
    }

    fn caldav(&self) -> Result<&ICloudCalDavClient> {
        if let Some(client) = self.caldav.get() {
            return Ok(client);
        }
        let client = create_caldav_client(&self.calendar_url, &self.username, &self.app_password)?;
        Ok(self.caldav.get_or_init(|| client))
    }
}

#[async_trait]
impl EventDestination for ICloudDestination {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_event(&self, event: &Event) -> Result<()> {
        let caldav = self.caldav()?;

        let ics_content = generate_ics(event);

        let full_url = event_url(&self.calendar_url, &event.uid);
        let href = url_to_href(&full_url);

        // PUT with If-None-Match: * (fails if the resource exists)
        caldav
            .request(PutResource::new(&href).create(&ics_content, mime_types::CALENDAR))
            .await
            .with_context(|| format!("Failed to create event {} in iCloud", event.uid))?;

        tracing::debug!(uid = %event.uid, href = %href, "Created iCloud event");
        Ok(())
    }
}
