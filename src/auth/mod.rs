//! Shared-secret authentication for the settings bridge.
//!
//! Secrets are checked through an injectable [`CredentialVerifier`]. The default
//! [`KeyRing`] accepts any of several configured keys so a secret can be rotated
//! without downtime, and compares in constant time to mitigate timing attacks.
//! An empty ring accepts nothing.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, Request},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Query parameter carrying the bridge secret.
pub const KEY_QUERY_PARAM: &str = "key";

/// Decides whether a presented credential is acceptable.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, presented: &str) -> bool;
}

/// Set of currently accepted shared secrets.
#[derive(Clone)]
pub struct KeyRing {
    keys: Vec<Vec<u8>>,
}

impl KeyRing {
    /// Build a key ring from the configured keys. Blank entries are skipped.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = keys
            .into_iter()
            .map(|k| k.as_ref().as_bytes().to_vec())
            .filter(|k| !k.is_empty())
            .collect();

        Self { keys }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl CredentialVerifier for KeyRing {
    fn verify(&self, presented: &str) -> bool {
        let presented = presented.as_bytes();
        // Every key is compared so the position of a match is not observable.
        self.keys
            .iter()
            .fold(subtle::Choice::from(0), |acc, key| acc | key.ct_eq(presented))
            .into()
    }
}

impl std::fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRing")
            .field("keys", &self.keys.len())
            .finish()
    }
}

/// Authentication layer function that takes the verifier as a parameter.
pub async fn bridge_key_layer(
    verifier: Arc<dyn CredentialVerifier>,
    request: Request,
    next: Next,
) -> Response {
    match presented_key(&request) {
        Some(key) if verifier.verify(&key) => next.run(request).await,
        Some(_) => {
            tracing::warn!("Rejected settings bridge request with invalid key");
            AppError::Unauthorized("Invalid bridge key".to_string()).into_response()
        }
        None => AppError::Unauthorized("Missing bridge key".to_string()).into_response(),
    }
}

/// Extract the credential from the `key` query parameter, the `x-api-key`
/// header, or a bearer token, in that order.
fn presented_key(request: &Request) -> Option<String> {
    let from_query = Query::<HashMap<String, String>>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(mut params)| params.remove(KEY_QUERY_PARAM));

    from_query
        .or_else(|| {
            request
                .headers()
                .get(API_KEY_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        })
        .or_else(|| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(|s| s.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(keys: &[&str]) -> KeyRing {
        KeyRing::from_keys(keys.iter().copied())
    }

    #[test]
    fn test_verify_equal() {
        assert!(ring(&["test-key-123"]).verify("test-key-123"));
    }

    #[test]
    fn test_verify_not_equal() {
        assert!(!ring(&["test-key-123"]).verify("test-key-124"));
    }

    #[test]
    fn test_verify_different_lengths() {
        assert!(!ring(&["much-longer-key"]).verify("short"));
    }

    #[test]
    fn test_verify_empty_presented() {
        assert!(!ring(&["not-empty"]).verify(""));
    }

    #[test]
    fn test_rotation_accepts_every_key() {
        let keys = ring(&["current", "previous"]);
        assert!(keys.verify("current"));
        assert!(keys.verify("previous"));
        assert!(!keys.verify("retired"));
    }

    #[test]
    fn test_empty_ring_rejects_everything() {
        let empty = KeyRing::from_keys(Vec::<String>::new());
        assert!(empty.is_empty());
        assert!(!empty.verify(""));
        assert!(!empty.verify("anything"));

        let blank = KeyRing::from_keys([""]);
        assert!(blank.is_empty());
        assert!(!blank.verify(""));
    }

    #[test]
    fn test_key_from_query_is_decoded() {
        let request = axum::http::Request::builder()
            .uri("/fod-bridge/v1/site-settings?foo=1&key=fod%2Dmigrate+2026")
            .body(axum::body::Body::empty())
            .unwrap();

        assert_eq!(presented_key(&request).as_deref(), Some("fod-migrate 2026"));
    }

    #[test]
    fn test_key_from_bearer_header() {
        let request = axum::http::Request::builder()
            .uri("/fod-bridge/v1/site-settings")
            .header(header::AUTHORIZATION, "Bearer secret")
            .body(axum::body::Body::empty())
            .unwrap();

        assert_eq!(presented_key(&request).as_deref(), Some("secret"));
    }
}
