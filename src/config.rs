//! Settings for the syncal CLI.
//!
//! Layered lowest to highest: built-in defaults, `~/.config/syncal/config.toml`,
//! `SYNCAL_*` environment variables (`SYNCAL_ICLOUD__CALENDAR_NAME`), and
//! finally the flat variables older setups use (`GOOGLE_CALENDAR_IDS`,
//! `ICLOUD_USERNAME`, ...).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use syncal_core::SyncConfig;
use syncal_core::constants::{
    DEFAULT_INTERVAL_SECS, DEFAULT_STATE_FILE, DEFAULT_TIMEZONE, DEFAULT_WINDOW_DAYS,
};

/// Flat environment variables and the settings key each one overrides.
const LEGACY_VARS: &[(&str, &str)] = &[
    ("GOOGLE_CLIENT_ID", "google.client_id"),
    ("GOOGLE_CLIENT_SECRET", "google.client_secret"),
    ("ICLOUD_USERNAME", "icloud.username"),
    ("ICLOUD_APP_SPECIFIC_PASSWORD", "icloud.app_password"),
    ("ICLOUD_CALENDAR_NAME", "icloud.calendar_name"),
    ("PRIMARY_TIMEZONE", "sync.timezone"),
    ("LOG_LEVEL", "log_level"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub google: GoogleSettings,

    #[serde(default)]
    pub icloud: ICloudSettings,

    #[serde(default)]
    pub sync: SyncSettings,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// OAuth client and the calendars to read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleSettings {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// Calendar ids fetched for every account ("primary", "team@group.calendar.google.com")
    #[serde(default)]
    pub calendar_ids: Vec<String>,

    /// Accounts to use; empty means every account with a stored session
    #[serde(default)]
    pub accounts: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ICloudSettings {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub app_password: String,

    #[serde(default)]
    pub calendar_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    pub window_days: u32,
    pub timezone: String,
    pub state_file: String,
    pub interval_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            window_days: DEFAULT_WINDOW_DAYS,
            timezone: DEFAULT_TIMEZONE.to_string(),
            state_file: DEFAULT_STATE_FILE.to_string(),
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            google: GoogleSettings::default(),
            icloud: ICloudSettings::default(),
            sync: SyncSettings::default(),
            log_level: default_log_level(),
        }
    }
}

/// Get the config directory path (~/.config/syncal)
pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("syncal"))
}

/// Get the config file path (~/.config/syncal/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

impl Settings {
    /// Load settings from the config file (optional) and the process environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let path = match config_file {
            Some(path) => path.to_path_buf(),
            None => config_path()?,
        };
        Self::load_from(&path, std::env::vars().collect())
    }

    fn load_from(path: &Path, vars: HashMap<String, String>) -> Result<Self> {
        let env = Environment::with_prefix("SYNCAL")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("google.calendar_ids")
            .with_list_parse_key("google.accounts")
            .source(Some(vars.clone()));

        let mut builder = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(env);

        for (var, key) in LEGACY_VARS {
            builder = builder.set_override_option(*key, legacy_var(&vars, var))?;
        }

        let calendar_ids = legacy_var(&vars, "GOOGLE_CALENDAR_IDS").map(|ids| split_list(&ids));
        builder = builder.set_override_option("google.calendar_ids", calendar_ids)?;

        builder
            .build()
            .with_context(|| format!("Failed to load settings from {}", path.display()))?
            .try_deserialize()
            .context("Invalid settings")
    }

    /// Build the orchestrator config.
    pub fn sync_config(&self, dry_run: bool) -> Result<SyncConfig> {
        let config = SyncConfig::new(
            self.sync.window_days,
            dry_run,
            &self.sync.timezone,
            &self.sync.state_file,
        )?;
        Ok(config)
    }

    /// Check that everything `syncal sync` needs is present.
    pub fn validate_for_sync(&self) -> Result<()> {
        if self.google.calendar_ids.is_empty() {
            anyhow::bail!(
                "No Google calendars configured.\n\n\
                Set GOOGLE_CALENDAR_IDS (comma-separated) or add to config.toml:\n\n\
                [google]\n\
                calendar_ids = [\"primary\"]"
            );
        }

        if self.icloud.username.trim().is_empty() || self.icloud.app_password.trim().is_empty() {
            anyhow::bail!(
                "iCloud credentials missing.\n\n\
                Set ICLOUD_USERNAME and ICLOUD_APP_SPECIFIC_PASSWORD, or add to config.toml:\n\n\
                [icloud]\n\
                username = \"you@icloud.com\"\n\
                app_password = \"xxxx-xxxx-xxxx-xxxx\""
            );
        }

        if self.icloud.calendar_name.trim().is_empty() {
            anyhow::bail!(
                "No iCloud calendar configured. Set ICLOUD_CALENDAR_NAME or [icloud] calendar_name"
            );
        }

        Ok(())
    }
}

/// Value of a flat variable, ignoring empty ones.
fn legacy_var(vars: &HashMap<String, String>, name: &str) -> Option<String> {
    vars.get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
