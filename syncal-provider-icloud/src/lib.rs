//! iCloud Calendar destination for syncal.
//!
//! Events are written as individual `.ics` resources into one calendar
//! collection, found by display name when connecting.

mod caldav;
mod destination;
mod discovery;
mod ics;

pub use destination::{CALDAV_ENDPOINT, ICloudDestination};
pub use ics::generate_ics;
