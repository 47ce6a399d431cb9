//! Loads a stored Google session (access token) we can call the Calendar API with.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app_config::GoogleCredentials;

pub struct Session {
    account: String,
    path: PathBuf,
    data: SessionData,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        SessionData {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at: Utc::now() + Duration::seconds(tokens.expires_in),
        }
    }
}

impl Session {
    pub fn path_for_account(sessions_dir: &Path, account: &str) -> PathBuf {
        let slug = account.replace(['/', '\\', ':'], "_");
        sessions_dir.join(format!("{}.toml", slug))
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// Load a session and refresh it if the access token has expired.
    pub async fn load_valid(
        sessions_dir: &Path,
        account: &str,
        creds: &GoogleCredentials,
    ) -> Result<Self> {
        let mut session = Self::load(sessions_dir, account)?;

        if session.is_expired() {
            debug!(account, "Access token expired, refreshing");
            session.refresh(creds).await?;
        }

        Ok(session)
    }

    pub fn load(sessions_dir: &Path, account: &str) -> Result<Self> {
        let path = Self::path_for_account(sessions_dir, account);

        if !path.exists() {
            anyhow::bail!(
                "Google session for {} not found at {}",
                account,
                path.display()
            );
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read Google session from {}", path.display()))?;

        let data: SessionData = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse Google session from {}", path.display()))?;

        Ok(Session {
            account: account.to_string(),
            path,
            data,
        })
    }

    pub fn client(&self, creds: &GoogleCredentials) -> Client {
        Client::new(
            creds.client_id.clone(),
            creds.client_secret.clone(),
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        )
    }

    fn is_expired(&self) -> bool {
        Utc::now() >= self.data.expires_at
    }

    async fn refresh(&mut self, creds: &GoogleCredentials) -> Result<()> {
        let client = self.client(creds);

        let mut tokens = client
            .refresh_access_token()
            .await
            .with_context(|| format!("Failed to refresh Google token for {}", self.account))?;

        // Google typically doesn't return a new refresh_token on refresh
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = self.data.refresh_token.clone();
        }

        self.data = (&tokens).into();
        self.save()
    }

    fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;

        // Owner-only, the file holds OAuth tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", self.path.display()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_session(dir: &Path, account: &str, expires_at: DateTime<Utc>) {
        let data = SessionData {
            access_token: "ya29.token".to_string(),
            refresh_token: "1//refresh".to_string(),
            expires_at,
        };
        let path = Session::path_for_account(dir, account);
        std::fs::write(path, toml::to_string_pretty(&data).unwrap()).unwrap();
    }

    #[test]
    fn test_load_stored_session() {
        let dir = tempfile::tempdir().unwrap();
        write_session(dir.path(), "me@example.com", Utc::now() + Duration::hours(1));

        let session = Session::load(dir.path(), "me@example.com").unwrap();

        assert_eq!(session.account(), "me@example.com");
        assert!(!session.is_expired());
    }

    #[test]
    fn test_missing_session_names_the_account() {
        let dir = tempfile::tempdir().unwrap();

        let err = Session::load(dir.path(), "nobody@example.com").err().unwrap();
        assert!(err.to_string().contains("nobody@example.com"));
    }

    #[test]
    fn test_expired_session_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        write_session(dir.path(), "me@example.com", Utc::now() - Duration::minutes(1));

        let session = Session::load(dir.path(), "me@example.com").unwrap();
        assert!(session.is_expired());
    }

    #[test]
    fn test_account_slug_strips_path_separators() {
        let path = Session::path_for_account(Path::new("/tmp/s"), "a/b:c");
        assert_eq!(path, PathBuf::from("/tmp/s/a_b_c.toml"));
    }
}
