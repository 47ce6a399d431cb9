use std::time::Duration;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use syncal_core::{CycleReport, EventSource, Syncer};
use syncal_provider_google::GoogleSource;
use syncal_provider_icloud::ICloudDestination;
use tokio::time::MissedTickBehavior;
use tracing::info;

use super::{google_credentials, resolve_accounts, sessions_dir};
use crate::config::Settings;

/// Run one cycle, or one every `interval` seconds until Ctrl-C.
pub async fn run(settings: &Settings, dry_run: bool, interval: Option<u64>) -> Result<()> {
    settings.validate_for_sync()?;
    let sync_config = settings.sync_config(dry_run)?;

    if dry_run {
        info!("Performing a dry run. No changes will be made.");
    }

    let credentials = google_credentials(settings)?;
    let sessions_dir = sessions_dir()?;
    let accounts = resolve_accounts(settings, &sessions_dir)?;

    let mut sources: Vec<Box<dyn EventSource>> = Vec::new();
    for account in &accounts {
        for calendar_id in &settings.google.calendar_ids {
            sources.push(Box::new(GoogleSource::new(
                account.as_str(),
                calendar_id.as_str(),
                sessions_dir.clone(),
                credentials.clone(),
            )));
        }
    }
    info!(accounts = accounts.len(), sources = sources.len(), "Initialized Google sources");

    let destination = ICloudDestination::connect(
        &settings.icloud.username,
        &settings.icloud.app_password,
        &settings.icloud.calendar_name,
    )
    .await
    .context("Failed to connect to iCloud")?;

    let mut syncer = Syncer::new(sync_config, sources, Box::new(destination))?;

    match interval {
        Some(secs) => watch(&mut syncer, secs).await,
        None => {
            info!("Running a single sync cycle");
            let report = syncer.run_cycle().await;
            print_report(&report, dry_run);
            Ok(())
        }
    }
}

/// Resolve `--watch [SECS]`: absent means a single cycle, a bare flag uses
/// `default_secs`. Zero is rejected.
pub fn watch_interval(watch: Option<Option<u64>>, default_secs: u64) -> Result<Option<u64>> {
    let interval = watch.map(|secs| secs.unwrap_or(default_secs));
    if interval == Some(0) {
        anyhow::bail!("--watch interval must be at least 1 second");
    }
    Ok(interval)
}

/// Cycles never overlap: the next tick is only awaited once a cycle is done,
/// and ticks missed during a long cycle are delayed, not bunched up.
async fn watch(syncer: &mut Syncer, secs: u64) -> Result<()> {
    info!(interval_secs = secs, "Starting watcher");

    let mut ticker = tokio::time::interval(Duration::from_secs(secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            result = &mut shutdown => {
                result.context("Failed to listen for Ctrl-C")?;
                info!("Interrupted, stopping watcher");
                return Ok(());
            }
            _ = ticker.tick() => {
                let report = syncer.run_cycle().await;
                print_report(&report, syncer.config().dry_run);
            }
        }
    }
}

fn print_report(report: &CycleReport, dry_run: bool) {
    let prefix = if dry_run { "[dry run] " } else { "" };

    if report.failed > 0 || report.failed_sources > 0 {
        println!("{}{}", prefix, report.to_string().yellow());
    } else {
        println!("{}{}", prefix, report.to_string().green());
    }
}
