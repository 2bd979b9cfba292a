//! Site settings document.

use serde_json::{Map, Value};

/// Flat snapshot of league-wide configuration values, keyed by field name.
///
/// Keys keep the order in which they were inserted.
pub type SettingsDocument = Map<String, Value>;
