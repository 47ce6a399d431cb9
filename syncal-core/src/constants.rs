/// Number of days ahead of now that each cycle fetches.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Largest window accepted, ten years.
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Default location of the sync state, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = "sync-state.json";

/// Timezone events are converted into when none is configured.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Seconds between cycles in watch mode.
pub const DEFAULT_INTERVAL_SECS: u64 = 300;
