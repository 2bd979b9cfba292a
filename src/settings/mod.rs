//! Site settings aggregation.
//!
//! The settings document is assembled from a declarative schema of field
//! descriptors. Per-league fields are expanded once for every configured
//! league slug, so adding a league is a configuration change only. Stored
//! values are passed through untouched; empty values fall back to an empty
//! list or an empty string depending on the field's shape.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::SettingsDocument;

/// Read access to the CMS option fields.
#[async_trait]
pub trait FieldSource: Send + Sync {
    /// Whether the field store can be read at all.
    async fn is_available(&self) -> Result<bool, AppError>;

    /// Fetch a stored field by name; `None` when it was never stored.
    async fn get_field(&self, name: &str) -> Result<Option<Value>, AppError>;
}

/// How a descriptor's key is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    /// One key per league: `<prefix>_<league>`.
    PerLeague(&'static str),
    /// A single site-wide key.
    Single(&'static str),
}

/// Value substituted when the stored field is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    EmptyList,
    EmptyString,
}

impl Fallback {
    pub fn value(self) -> Value {
        match self {
            Fallback::EmptyList => Value::Array(Vec::new()),
            Fallback::EmptyString => Value::String(String::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub fallback: Fallback,
}

impl FieldDescriptor {
    const fn per_league(prefix: &'static str) -> Self {
        Self {
            key: FieldKey::PerLeague(prefix),
            fallback: Fallback::EmptyList,
        }
    }

    const fn list(name: &'static str) -> Self {
        Self {
            key: FieldKey::Single(name),
            fallback: Fallback::EmptyList,
        }
    }

    /// Expand into concrete field names for the given leagues.
    pub fn field_names(&self, leagues: &[String]) -> Vec<String> {
        match self.key {
            FieldKey::PerLeague(prefix) => leagues
                .iter()
                .map(|league| format!("{}_{}", prefix, league))
                .collect(),
            FieldKey::Single(name) => vec![name.to_string()],
        }
    }
}

/// Top-level settings fields, in output order.
pub const SETTINGS_SCHEMA: &[FieldDescriptor] = &[
    // International signing bonus pool balances
    FieldDescriptor::per_league("isbp"),
    // Minor league balances
    FieldDescriptor::per_league("milb"),
    FieldDescriptor::list("luxury_tax_thresholds"),
    // Dead cap overrides and other hand-entered financials
    FieldDescriptor::list("manual_team_financials"),
    FieldDescriptor::list("extension_usage_log"),
    FieldDescriptor::list("restructure_usage_log"),
    FieldDescriptor::per_league("dates"),
    FieldDescriptor::list("trade_deadlines"),
    FieldDescriptor::list("opening_days"),
    FieldDescriptor::list("league_slack_channels"),
];

/// Key of the nested page reference mapping.
pub const PAGE_IDS_KEY: &str = "page_ids";

/// Page reference fields collected under [`PAGE_IDS_KEY`].
pub const PAGE_FIELDS: &[&str] = &[
    "trade_page",
    "free_agent_page",
    "view_pending_trades_page",
    "roster_page",
    "waiver_wire_page",
    "league_rosters_page",
    "registration_page",
];

/// Every top-level key a settings document carries, in output order.
pub fn known_keys(leagues: &[String]) -> Vec<String> {
    SETTINGS_SCHEMA
        .iter()
        .flat_map(|descriptor| descriptor.field_names(leagues))
        .chain(std::iter::once(PAGE_IDS_KEY.to_string()))
        .collect()
}

/// Assemble the full settings document.
///
/// Fails as a whole when the field store is unavailable or any read fails.
pub async fn aggregate(
    source: &dyn FieldSource,
    leagues: &[String],
) -> Result<SettingsDocument, AppError> {
    if !source.is_available().await? {
        return Err(AppError::DependencyMissing(
            "Site option field store is not installed".to_string(),
        ));
    }

    let mut document = SettingsDocument::new();

    for descriptor in SETTINGS_SCHEMA {
        for name in descriptor.field_names(leagues) {
            let value = read_or_default(source, &name, descriptor.fallback).await?;
            document.insert(name, value);
        }
    }

    let mut page_ids = Map::new();
    for &name in PAGE_FIELDS {
        let value = read_or_default(source, name, Fallback::EmptyString).await?;
        page_ids.insert(name.to_string(), value);
    }
    document.insert(PAGE_IDS_KEY.to_string(), Value::Object(page_ids));

    tracing::debug!(fields = document.len(), "Assembled settings document");
    Ok(document)
}

async fn read_or_default(
    source: &dyn FieldSource,
    name: &str,
    fallback: Fallback,
) -> Result<Value, AppError> {
    Ok(match source.get_field(name).await? {
        Some(value) if !is_blank(&value) => value,
        _ => fallback.value(),
    })
}

/// Values the CMS treats as "no value": null, false, zero, `""`, `"0"`, and
/// empty containers.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    struct MemorySource {
        available: bool,
        fields: HashMap<String, Value>,
    }

    impl MemorySource {
        fn with(fields: &[(&str, Value)]) -> Self {
            Self {
                available: true,
                fields: fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl FieldSource for MemorySource {
        async fn is_available(&self) -> Result<bool, AppError> {
            Ok(self.available)
        }

        async fn get_field(&self, name: &str) -> Result<Option<Value>, AppError> {
            Ok(self.fields.get(name).cloned())
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl FieldSource for BrokenSource {
        async fn is_available(&self) -> Result<bool, AppError> {
            Ok(true)
        }

        async fn get_field(&self, name: &str) -> Result<Option<Value>, AppError> {
            if name == "opening_days" {
                Err(AppError::Database("disk I/O error".to_string()))
            } else {
                Ok(None)
            }
        }
    }

    fn leagues() -> Vec<String> {
        ["mlb", "aaa", "aa", "high_a"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_known_keys_order() {
        let keys = known_keys(&leagues());
        assert_eq!(keys.len(), 4 * 3 + 7 + 1);
        assert_eq!(&keys[..4], ["isbp_mlb", "isbp_aaa", "isbp_aa", "isbp_high_a"]);
        assert_eq!(keys[8], "luxury_tax_thresholds");
        assert_eq!(keys[12], "dates_mlb");
        assert_eq!(keys.last().map(String::as_str), Some("page_ids"));
    }

    #[test]
    fn test_added_league_expands_every_per_league_field() {
        let keys = known_keys(&["low_a".to_string()]);
        assert!(keys.contains(&"isbp_low_a".to_string()));
        assert!(keys.contains(&"milb_low_a".to_string()));
        assert!(keys.contains(&"dates_low_a".to_string()));
    }

    #[test]
    fn test_blank_values() {
        for blank in [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!("0"),
            json!([]),
            json!({}),
        ] {
            assert!(is_blank(&blank), "{blank} should be blank");
        }
        for present in [json!(true), json!(7), json!("00"), json!([0]), json!({"a": 1})] {
            assert!(!is_blank(&present), "{present} should be kept");
        }
    }

    #[tokio::test]
    async fn test_empty_store_defaults_every_key() {
        let doc = aggregate(&MemorySource::with(&[]), &leagues()).await.unwrap();

        for key in known_keys(&leagues()) {
            let value = doc.get(&key).unwrap_or_else(|| panic!("missing {key}"));
            assert!(!value.is_null(), "{key} is null");
        }
        assert_eq!(doc["isbp_mlb"], json!([]));
        for field in PAGE_FIELDS {
            assert_eq!(doc["page_ids"][*field], json!(""));
        }
    }

    #[tokio::test]
    async fn test_only_luxury_tax_populated() {
        let source = MemorySource::with(&[
            ("luxury_tax_thresholds", json!({"2026": 250000000})),
            ("trade_deadlines", json!("")),
        ]);
        let doc = aggregate(&source, &leagues()).await.unwrap();

        assert_eq!(doc["luxury_tax_thresholds"], json!({"2026": 250000000}));
        for key in known_keys(&leagues()) {
            match key.as_str() {
                "luxury_tax_thresholds" => {}
                "page_ids" => assert!(doc[&key].as_object().unwrap().values().all(|v| v == "")),
                _ => assert_eq!(doc[&key], json!([]), "{key}"),
            }
        }
    }

    #[tokio::test]
    async fn test_values_pass_through_untouched() {
        let balances = json!([{"team_id": "SEA", "balance": "1,250,000"}]);
        let source = MemorySource::with(&[
            ("isbp_aa", balances.clone()),
            ("roster_page", json!(118)),
        ]);
        let doc = aggregate(&source, &leagues()).await.unwrap();

        assert_eq!(doc["isbp_aa"], balances);
        assert_eq!(doc["page_ids"]["roster_page"], json!(118));
    }

    #[tokio::test]
    async fn test_unavailable_store_is_dependency_missing() {
        let source = MemorySource {
            available: false,
            fields: HashMap::new(),
        };
        let err = aggregate(&source, &leagues()).await.unwrap_err();
        assert!(matches!(err, AppError::DependencyMissing(_)));
    }

    #[tokio::test]
    async fn test_read_failure_fails_whole_document() {
        let err = aggregate(&BrokenSource, &leagues()).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
