//! Core types for syncal.
//!
//! This crate holds everything that makes sync decisions:
//! - `Event`, the provider-neutral event model
//! - `SyncState`, the persisted source id -> destination UID mapping
//! - `EventSource` / `EventDestination`, the seams adapters plug into
//! - `Syncer`, which runs one sync cycle over them

pub mod config;
pub mod constants;
pub mod destination;
pub mod error;
pub mod event;
pub mod source;
pub mod state;
pub mod syncer;
pub mod window;

pub use config::SyncConfig;
pub use destination::EventDestination;
pub use error::{SyncalError, SyncalResult};
pub use event::{Event, generate_uid};
pub use source::EventSource;
pub use state::SyncState;
pub use syncer::{CycleReport, Syncer};
pub use window::SyncWindow;
