//! Validated configuration for a `Syncer`.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;

use crate::constants::{DEFAULT_STATE_FILE, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use crate::error::{SyncalError, SyncalResult};

/// Everything the orchestrator needs to know besides its adapters.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Days ahead of now to fetch each cycle
    pub window_days: u32,
    /// Log intended creates instead of performing them
    pub dry_run: bool,
    /// Timezone event times are converted into before they are written
    pub timezone: Tz,
    /// Where the sync state is persisted
    pub state_path: PathBuf,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            window_days: DEFAULT_WINDOW_DAYS,
            dry_run: false,
            timezone: Tz::UTC,
            state_path: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

impl SyncConfig {
    /// Build a config, rejecting values a cycle cannot run with.
    ///
    /// `~` in `state_path` is expanded to the home directory.
    pub fn new(
        window_days: u32,
        dry_run: bool,
        timezone: &str,
        state_path: impl AsRef<Path>,
    ) -> SyncalResult<Self> {
        if window_days == 0 {
            return Err(SyncalError::Config(
                "window_days must be at least 1".into(),
            ));
        }
        if window_days > MAX_WINDOW_DAYS {
            return Err(SyncalError::Config(format!(
                "window_days must be at most {} (got {})",
                MAX_WINDOW_DAYS, window_days
            )));
        }

        let state_path = expand_path(state_path.as_ref());
        if state_path.as_os_str().is_empty() {
            return Err(SyncalError::Config("state file path is empty".into()));
        }

        Ok(SyncConfig {
            window_days,
            dry_run,
            timezone: parse_timezone(timezone)?,
            state_path,
        })
    }
}

/// Parse an IANA timezone name such as "Europe/Oslo".
pub fn parse_timezone(name: &str) -> SyncalResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| SyncalError::Config(format!("invalid timezone '{}'", name)))
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_valid_values() {
        let config = SyncConfig::new(7, true, "America/New_York", "state.json").unwrap();

        assert_eq!(config.window_days, 7);
        assert!(config.dry_run);
        assert_eq!(config.timezone, chrono_tz::America::New_York);
        assert_eq!(config.state_path, PathBuf::from("state.json"));
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        let err = SyncConfig::new(7, false, "Mars/Olympus_Mons", "state.json").unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus_Mons"), "got {}", err);
    }

    #[test]
    fn test_zero_window_is_rejected() {
        assert!(SyncConfig::new(0, false, "UTC", "state.json").is_err());
    }

    #[test]
    fn test_oversized_window_is_rejected() {
        assert!(SyncConfig::new(MAX_WINDOW_DAYS, false, "UTC", "state.json").is_ok());

        let err = SyncConfig::new(200_000_000, false, "UTC", "state.json").unwrap_err();
        assert!(matches!(err, SyncalError::Config(_)), "got {:?}", err);
        assert!(err.to_string().contains("at most"), "got {}", err);
    }

    #[test]
    fn test_tilde_is_expanded() {
        let config = SyncConfig::new(7, false, "UTC", "~/sync-state.json").unwrap();
        assert!(!config.state_path.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_default_matches_constants() {
        let config = SyncConfig::default();
        assert_eq!(config.window_days, DEFAULT_WINDOW_DAYS);
        assert_eq!(config.timezone, Tz::UTC);
        assert!(!config.dry_run);
    }
}
