//! Google Calendar event source for syncal.
//!
//! Reads stored OAuth sessions from:
//!   ~/.config/syncal/google/session/{account}.toml
//!
//! Sessions are created outside of syncal; this crate only loads them and
//! refreshes the access token when it has expired.

mod app_config;
mod calendars;
mod convert;
mod session;
mod source;

pub use app_config::{GoogleCredentials, base_dir};
pub use calendars::{CalendarInfo, discover_accounts, list_calendars};
pub use session::Session;
pub use source::GoogleSource;
