//! CalDAV endpoint discovery for iCloud.
//!
//! 1. PROPFIND on caldav.icloud.com for the user's principal URL
//! 2. PROPFIND on the principal for the calendar-home-set URL
//! 3. PROPFIND (Depth 1) on the home set to list calendar collections

use anyhow::{Context, Result};
use reqwest::{Client, Method, Url};

const PRINCIPAL_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<d:propfind xmlns:d="DAV:">
  <d:prop>
    <d:current-user-principal/>
  </d:prop>
</d:propfind>"#;

const HOME_SET_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<d:propfind xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:caldav">
  <d:prop>
    <c:calendar-home-set/>
  </d:prop>
</d:propfind>"#;

const CALENDARS_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<d:propfind xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:caldav">
  <d:prop>
    <d:displayname/>
    <d:resourcetype/>
  </d:prop>
</d:propfind>"#;

/// A calendar collection listed under the calendar home set.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCollection {
    pub url: String,
    pub name: String,
}

/// Authenticated PROPFIND helper bound to one account.
pub struct Discovery {
    client: Client,
    username: String,
    password: String,
}

impl Discovery {
    pub fn new(username: &str, password: &str) -> Result<Self> {
        // iCloud redirects to a user-specific pXX-caldav.icloud.com host
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Resolve the URL of the calendar whose display name is `calendar_name`.
    pub async fn find_calendar(&self, endpoint: &str, calendar_name: &str) -> Result<String> {
        let principal_url = self.principal_url(endpoint).await?;
        let home_url = self.calendar_home_url(&principal_url).await?;
        let calendars = self.list_calendars(&home_url).await?;

        tracing::debug!(count = calendars.len(), home = %home_url, "Listed iCloud calendars");

        calendars
            .into_iter()
            .find(|c| c.name == calendar_name)
            .map(|c| c.url)
            .with_context(|| format!("No calendar found with name '{}'", calendar_name))
    }

    async fn principal_url(&self, endpoint: &str) -> Result<String> {
        let (body, final_url) = self
            .propfind(endpoint, "0", PRINCIPAL_BODY)
            .await
            .context("Failed to connect to iCloud CalDAV")?;

        let href = extract_href(&body, "current-user-principal")?
            .context("Could not find principal URL in response")?;

        absolute_url(&final_url, &href)
    }

    async fn calendar_home_url(&self, principal_url: &str) -> Result<String> {
        let (body, final_url) = self
            .propfind(principal_url, "0", HOME_SET_BODY)
            .await
            .context("Failed to get calendar home")?;

        let href = extract_href(&body, "calendar-home-set")?
            .context("Could not find calendar-home-set in response")?;

        absolute_url(&final_url, &href)
    }

    async fn list_calendars(&self, home_url: &str) -> Result<Vec<CalendarCollection>> {
        let (body, final_url) = self
            .propfind(home_url, "1", CALENDARS_BODY)
            .await
            .context("Failed to list calendars")?;

        parse_calendar_list(&body)?
            .into_iter()
            .map(|(href, name)| {
                Ok(CalendarCollection {
                    url: absolute_url(&final_url, &href)?,
                    name,
                })
            })
            .collect()
    }

    /// Send a PROPFIND and return the body with the URL it was served from.
    async fn propfind(&self, url: &str, depth: &str, body: &'static str) -> Result<(String, Url)> {
        let method = Method::from_bytes(b"PROPFIND").context("Invalid HTTP method")?;

        let response = self
            .client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Content-Type", "application/xml; charset=utf-8")
            .header("Depth", depth)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let final_url = response.url().clone();

        if status.as_u16() == 401 {
            anyhow::bail!(
                "iCloud authentication failed. Check your Apple ID and app-specific password."
            );
        }
        if !status.is_success() {
            anyhow::bail!("PROPFIND {} failed (status {})", url, status);
        }

        let text = response.text().await.context("Failed to read response body")?;
        Ok((text, final_url))
    }
}

/// Resolve `href` against the URL the response came from.
fn absolute_url(base: &Url, href: &str) -> Result<String> {
    let url = base
        .join(href)
        .with_context(|| format!("Invalid href in response: {}", href))?;
    Ok(url.to_string())
}

/// First `<href>` inside the named property of a multistatus response.
fn extract_href(xml: &str, property_name: &str) -> Result<Option<String>> {
    let doc = roxmltree::Document::parse(xml).context("Invalid XML in PROPFIND response")?;

    let href = doc
        .descendants()
        .find(|n| n.tag_name().name() == property_name)
        .and_then(|prop| prop.descendants().find(|n| n.tag_name().name() == "href"))
        .and_then(|n| n.text())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(href)
}

/// `(href, displayname)` of every calendar collection in a Depth 1 listing.
///
/// Plain collections (the home set itself, inbox/outbox) are skipped because
/// their resourcetype has no `<calendar/>` child.
fn parse_calendar_list(xml: &str) -> Result<Vec<(String, String)>> {
    let doc = roxmltree::Document::parse(xml).context("Invalid XML in PROPFIND response")?;
    let mut calendars = Vec::new();

    for response in doc.descendants().filter(|n| n.tag_name().name() == "response") {
        let is_calendar = response
            .descendants()
            .filter(|n| n.tag_name().name() == "resourcetype")
            .any(|rt| rt.children().any(|c| c.tag_name().name() == "calendar"));
        if !is_calendar {
            continue;
        }

        let Some(href) = response
            .children()
            .find(|n| n.tag_name().name() == "href")
            .and_then(|n| n.text())
            .map(|s| s.trim().to_string())
        else {
            continue;
        };

        let name = response
            .descendants()
            .find(|n| n.tag_name().name() == "displayname")
            .and_then(|n| n.text())
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        calendars.push((href, name));
    }

    Ok(calendars)
}
