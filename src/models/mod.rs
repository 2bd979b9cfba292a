//! Data models for the league directory, roster and settings payloads.
//!
//! Field names match the JSON consumed by the dashboard views exactly.

mod league;
mod settings;
mod snapshot;
mod team;

pub use league::*;
pub use settings::*;
pub use snapshot::*;
pub use team::*;
