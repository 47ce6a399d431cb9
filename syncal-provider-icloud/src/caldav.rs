//! CalDAV client helpers for iCloud using libdav.

use anyhow::{Context, Result};
use http::Uri;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use libdav::CalDavClient;
use libdav::dav::WebDavClient;
use tower::ServiceBuilder;
use tower_http::{auth::AddAuthorization, follow_redirect::FollowRedirect};

type HttpClient = FollowRedirect<
    AddAuthorization<
        Client<
            hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
            String,
        >,
    >,
>;

pub type ICloudCalDavClient = CalDavClient<HttpClient>;

/// Create a libdav CalDavClient with basic auth that follows redirects
/// (iCloud redirects to user-specific pXX-caldav.icloud.com hosts).
pub fn create_caldav_client(
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<ICloudCalDavClient> {
    let uri: Uri = base_url
        .parse()
        .with_context(|| format!("Invalid base URL: {}", base_url))?;

    let https_connector = HttpsConnectorBuilder::new()
        .with_native_roots()
        .context("Failed to load native TLS roots")?
        .https_or_http()
        .enable_http1()
        .build();

    let http_client = Client::builder(TokioExecutor::new()).build(https_connector);
    let auth_client = AddAuthorization::basic(http_client, username, password);

    let client = ServiceBuilder::new()
        .layer(tower_http::follow_redirect::FollowRedirectLayer::new())
        .service(auth_client);

    let webdav = WebDavClient::new(uri, client);
    Ok(CalDavClient::new(webdav))
}

/// URL of the resource holding the event with `event_uid`.
pub fn event_url(calendar_url: &str, event_uid: &str) -> String {
    let base = calendar_url.trim_end_matches('/');
    format!("{}/{}.ics", base, event_uid)
}

/// Path part of a full URL.
///
/// "https://p42-caldav.icloud.com/123/calendars/abc/" -> "/123/calendars/abc/"
pub fn url_to_href(url: &str) -> String {
    if let Ok(uri) = url.parse::<Uri>() {
        uri.path().to_string()
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_url_joins_without_double_slash() {
        assert_eq!(
            event_url("https://p42-caldav.icloud.com/123/calendars/work/", "uid-1"),
            "https://p42-caldav.icloud.com/123/calendars/work/uid-1.ics"
        );
        assert_eq!(
            event_url("https://p42-caldav.icloud.com/123/calendars/work", "uid-1"),
            "https://p42-caldav.icloud.com/123/calendars/work/uid-1.ics"
        );
    }

    #[test]
    fn test_url_to_href_keeps_path() {
        assert_eq!(
            url_to_href("https://p42-caldav.icloud.com/123/calendars/work/uid-1.ics"),
            "/123/calendars/work/uid-1.ics"
        );
    }
}
