pub mod calendars;
pub mod status;
pub mod sync;

use std::path::{Path, PathBuf};

use anyhow::Result;
use syncal_provider_google::{GoogleCredentials, base_dir, discover_accounts};

use crate::config::Settings;

/// Where stored Google sessions live (~/.config/syncal/google/session)
pub fn sessions_dir() -> Result<PathBuf> {
    Ok(base_dir()?.join("session"))
}

pub fn google_credentials(settings: &Settings) -> Result<GoogleCredentials> {
    GoogleCredentials::new(&settings.google.client_id, &settings.google.client_secret)
}

/// Accounts from settings, or every account with a stored session.
pub fn resolve_accounts(settings: &Settings, sessions_dir: &Path) -> Result<Vec<String>> {
    let accounts = if settings.google.accounts.is_empty() {
        discover_accounts(sessions_dir)?
    } else {
        settings.google.accounts.clone()
    };

    if accounts.is_empty() {
        anyhow::bail!(
            "No Google accounts found.\n\n\
            Store a session for each account in {}/<account>.toml",
            sessions_dir.display()
        );
    }

    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_accounts(accounts: &[&str]) -> Settings {
        let mut settings = Settings::default();
        settings.google.accounts = accounts.iter().map(|a| a.to_string()).collect();
        settings
    }

    #[test]
    fn test_resolve_accounts_prefers_settings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("other@example.com.toml"), "").unwrap();

        let settings = settings_with_accounts(&["me@example.com"]);
        let accounts = resolve_accounts(&settings, dir.path()).unwrap();

        assert_eq!(accounts, vec!["me@example.com"]);
    }

    #[test]
    fn test_resolve_accounts_discovers_sessions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("me@example.com.toml"), "").unwrap();

        let settings = settings_with_accounts(&[]);
        let accounts = resolve_accounts(&settings, dir.path()).unwrap();

        assert_eq!(accounts, vec!["me@example.com"]);
    }

    #[test]
    fn test_resolve_accounts_none_found() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_accounts(&[]);

        let err = resolve_accounts(&settings, dir.path()).unwrap_err().to_string();
        assert!(err.contains("No Google accounts found"), "{}", err);
    }

    #[test]
    fn test_google_credentials_required() {
        let mut settings = settings_with_accounts(&[]);
        settings.google.client_id.clear();
        settings.google.client_secret = "secret".to_string();
        assert!(google_credentials(&settings).is_err());

        settings.google.client_id = "id.apps.googleusercontent.com".to_string();
        assert!(google_credentials(&settings).is_ok());
    }
}
