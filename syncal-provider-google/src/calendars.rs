use std::path::Path;

use anyhow::{Context, Result};
use google_calendar::types::MinAccessRole;

use crate::app_config::GoogleCredentials;
use crate::session::Session;

/// A calendar visible to an account.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarInfo {
    pub id: String,
    pub name: String,
    pub primary: bool,
}

/// Accounts that have a stored session, sorted by name.
pub fn discover_accounts(sessions_dir: &Path) -> Result<Vec<String>> {
    if !sessions_dir.exists() {
        return Ok(vec![]);
    }

    let mut accounts = Vec::new();
    let entries = std::fs::read_dir(sessions_dir)
        .with_context(|| format!("Failed to read {}", sessions_dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.extension().map(|e| e == "toml").unwrap_or(false) {
            if let Some(stem) = path.file_stem() {
                accounts.push(stem.to_string_lossy().into_owned());
            }
        }
    }

    accounts.sort();
    Ok(accounts)
}

/// Fetch the list of calendars for an account
pub async fn list_calendars(
    session: &Session,
    creds: &GoogleCredentials,
) -> Result<Vec<CalendarInfo>> {
    let client = session.client(creds);

    let response = client
        .calendar_list()
        .list_all(MinAccessRole::default(), false, false)
        .await
        .with_context(|| format!("Failed to fetch calendars for {}", session.account()))?;

    Ok(response
        .body
        .into_iter()
        .filter(|c| !c.id.is_empty())
        .map(|c| CalendarInfo {
            id: c.id,
            name: if c.summary.is_empty() {
                "(unnamed)".to_string()
            } else {
                c.summary
            },
            primary: c.primary,
        })
        .collect())
}
