use anyhow::Result;
use owo_colors::OwoColorize;
use syncal_core::SyncState;

use crate::config::Settings;

pub fn run(settings: &Settings) -> Result<()> {
    let sync_config = settings.sync_config(false)?;
    let path = &sync_config.state_path;
    let state = SyncState::load(path)?;

    println!("{} {}", "State file:".bold(), path.display());
    if path.exists() {
        println!("{} {}", "Synced events:".bold(), state.len());
    } else {
        println!("{} {}", "Synced events:".bold(), "none yet".dimmed());
    }

    let calendars = if settings.google.calendar_ids.is_empty() {
        "(none configured)".to_string()
    } else {
        settings.google.calendar_ids.join(", ")
    };
    println!("{} {}", "Google calendars:".bold(), calendars);

    let target = if settings.icloud.calendar_name.is_empty() {
        "(none configured)"
    } else {
        settings.icloud.calendar_name.as_str()
    };
    println!("{} {}", "iCloud calendar:".bold(), target);
    println!(
        "{} {} days, {}",
        "Window:".bold(),
        sync_config.window_days,
        sync_config.timezone
    );

    Ok(())
}
