//! OAuth client configuration for the Google source.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Google OAuth client credentials (user-provided).
#[derive(Debug, Clone)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl GoogleCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            anyhow::bail!(
                "Google OAuth client credentials missing.\n\n\
                Set GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET, or add them to config.toml:\n\n\
                [google]\n\
                client_id = \"your-client-id.apps.googleusercontent.com\"\n\
                client_secret = \"your-client-secret\"\n\n\
                See https://console.cloud.google.com/apis/credentials for setup."
            );
        }

        Ok(GoogleCredentials {
            client_id,
            client_secret,
        })
    }
}

/// Directory the Google source keeps its state in.
pub fn base_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("syncal")
        .join("google"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_credentials_are_rejected() {
        let err = GoogleCredentials::new("id", "  ").unwrap_err();
        assert!(err.to_string().contains("GOOGLE_CLIENT_SECRET"));
    }

    #[test]
    fn test_credentials_accepted() {
        let creds = GoogleCredentials::new("id.apps.googleusercontent.com", "secret").unwrap();
        assert_eq!(creds.client_id, "id.apps.googleusercontent.com");
    }
}
