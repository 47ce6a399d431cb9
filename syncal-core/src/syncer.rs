//! One-way sync orchestration.
//!
//! A cycle pulls events from every source, drops the ones the state says
//! were already synced, and creates the rest at the destination. Failures
//! are contained: a source that cannot be fetched is skipped, an event that
//! cannot be created stays unsynced and is retried next cycle.

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::config::SyncConfig;
use crate::destination::EventDestination;
use crate::error::{SyncalError, SyncalResult};
use crate::event::Event;
use crate::source::EventSource;
use crate::state::SyncState;
use crate::window::SyncWindow;

/// Counts describing what one cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Events returned by all sources that answered
    pub fetched: usize,
    /// Events skipped because they were already synced
    pub skipped: usize,
    /// Events created at the destination
    pub created: usize,
    /// Events that would have been created (dry run only)
    pub planned: usize,
    /// Events the destination rejected
    pub failed: usize,
    /// Sources whose fetch failed
    pub failed_sources: usize,
    /// Whether the state was written at the end of the cycle
    pub state_saved: bool,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fetched, {} created, {} already synced, {} failed",
            self.fetched, self.created, self.skipped, self.failed
        )?;
        if self.planned > 0 {
            write!(f, ", {} planned", self.planned)?;
        }
        if self.failed_sources > 0 {
            write!(f, " ({} source(s) unavailable)", self.failed_sources)?;
        }
        Ok(())
    }
}

enum EventOutcome {
    Skipped,
    Planned,
    Created,
    Failed,
}

pub struct Syncer {
    config: SyncConfig,
    sources: Vec<Box<dyn EventSource>>,
    destination: Box<dyn EventDestination>,
    state: SyncState,
}

impl Syncer {
    /// Create a syncer, loading the state from `config.state_path`.
    ///
    /// A missing state file starts from an empty state; an unreadable or
    /// corrupt one is an error.
    pub fn new(
        config: SyncConfig,
        sources: Vec<Box<dyn EventSource>>,
        destination: Box<dyn EventDestination>,
    ) -> SyncalResult<Self> {
        let state = SyncState::load(&config.state_path)?;

        if state.is_empty() {
            info!(file = %config.state_path.display(), "No synced events recorded, starting fresh");
        } else {
            info!(file = %config.state_path.display(), entries = state.len(), "Loaded sync state");
        }

        Ok(Self::with_state(config, sources, destination, state))
    }

    pub fn with_state(
        config: SyncConfig,
        sources: Vec<Box<dyn EventSource>>,
        destination: Box<dyn EventDestination>,
        state: SyncState,
    ) -> Self {
        Syncer {
            config,
            sources,
            destination,
            state,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// Run one complete sync cycle.
    ///
    /// Never fails: every error is logged and reflected in the report.
    #[tracing::instrument(name = "sync_cycle", skip(self), fields(dry_run = self.config.dry_run))]
    pub async fn run_cycle(&mut self) -> CycleReport {
        info!("Starting sync cycle");

        let window = SyncWindow::forward(self.config.window_days);
        let mut report = CycleReport::default();

        let events = self.fetch_all(&window, &mut report).await;
        report.fetched = events.len();
        info!(count = events.len(), "Fetched events from all sources");

        for event in events {
            match self.sync_event(event).await {
                EventOutcome::Skipped => report.skipped += 1,
                EventOutcome::Planned => report.planned += 1,
                EventOutcome::Created => report.created += 1,
                EventOutcome::Failed => report.failed += 1,
            }
        }

        if !self.config.dry_run {
            match self.state.save() {
                Ok(()) => report.state_saved = true,
                Err(e) => error!(error = %e, "Failed to save sync state"),
            }
        }

        info!(
            fetched = report.fetched,
            created = report.created,
            skipped = report.skipped,
            planned = report.planned,
            failed = report.failed,
            failed_sources = report.failed_sources,
            "Sync cycle finished"
        );

        report
    }

    /// Fetch from every source in order, skipping the ones that fail.
    async fn fetch_all(&self, window: &SyncWindow, report: &mut CycleReport) -> Vec<Event> {
        let mut all_events = Vec::new();

        for source in &self.sources {
            match source.fetch_events(window).await {
                Ok(events) => {
                    debug!(source = source.name(), count = events.len(), "Fetched events");
                    all_events.extend(events);
                }
                Err(e) => {
                    let err = SyncalError::Source {
                        source_name: source.name().to_string(),
                        reason: format!("{:#}", e),
                    };
                    error!(error = %err, "Could not fetch events, skipping source");
                    report.failed_sources += 1;
                }
            }
        }

        all_events
    }

    async fn sync_event(&mut self, mut event: Event) -> EventOutcome {
        if self.state.contains(&event.id) {
            // Updates are not propagated: presence in the state is final
            debug!(title = %event.title, id = %event.id, "Event already synced, skipping");
            return EventOutcome::Skipped;
        }

        info!(title = %event.title, source = %event.source, "New event found");

        if event.ensure_uid() {
            warn!(title = %event.title, uid = %event.uid, "Event has no UID, generated a new one");
        }

        event.to_timezone(self.config.timezone);

        if self.config.dry_run {
            info!(
                title = %event.title,
                start = %event.start,
                destination = self.destination.name(),
                "[DRY RUN] Would create event"
            );
            return EventOutcome::Planned;
        }

        if let Err(e) = self.destination.create_event(&event).await {
            let err = SyncalError::Destination {
                destination: self.destination.name().to_string(),
                reason: format!("{:#}", e),
            };
            error!(title = %event.title, id = %event.id, error = %err, "Failed to sync event");
            return EventOutcome::Failed;
        }

        self.state.put(event.id, event.uid);
        EventOutcome::Created
    }
}
