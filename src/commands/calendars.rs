use anyhow::Result;
use owo_colors::OwoColorize;
use syncal_provider_google::{Session, list_calendars};

use super::{google_credentials, resolve_accounts, sessions_dir};
use crate::config::Settings;

/// Print the calendars of each Google account. A failing account is
/// reported and the rest are still listed.
pub async fn run(settings: &Settings) -> Result<()> {
    let credentials = google_credentials(settings)?;
    let sessions_dir = sessions_dir()?;
    let accounts = resolve_accounts(settings, &sessions_dir)?;

    for (i, account) in accounts.iter().enumerate() {
        println!("{}", account.bold());

        let result = match Session::load_valid(&sessions_dir, account, &credentials).await {
            Ok(session) => list_calendars(&session, &credentials).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(calendars) if calendars.is_empty() => println!("   {}", "(no calendars)".dimmed()),
            Ok(calendars) => {
                for cal in calendars {
                    let marker = if cal.primary { " (primary)" } else { "" };
                    println!("   {}  {}{}", cal.id, cal.name.dimmed(), marker.dimmed());
                }
            }
            Err(e) => println!("   {}", format!("{:#}", e).red()),
        }

        if i < accounts.len() - 1 {
            println!();
        }
    }

    Ok(())
}
