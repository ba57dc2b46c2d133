//! Credential provider abstraction for the transport core
//!
//! Defines the `CredentialProvider` trait that decouples request execution
//! from credential storage. The transport reads the current bearer token,
//! API key and refresh token when it builds headers, and writes back through
//! `on_refresh_success` after a coordinated refresh. Storage lives with the
//! caller-facing client (`MemoryCredentials`), or is fixed (`StaticCredentials`).

pub mod memory;
pub mod fixed;

pub use fixed::StaticCredentials;
pub use memory::MemoryCredentials;

use serde::{Deserialize, Serialize};

/// Result of one successful token refresh.
///
/// Produced by exactly one in-flight refresh and handed to every request
/// waiting on it. `expires_in` is a delta in seconds, not an absolute time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshOutcome {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires
    pub expires_in: u64,
    /// Profile of the authenticated user, when the platform includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

/// Source of the credentials attached to outgoing requests.
///
/// Values may change between calls (after a refresh, or when the caller
/// logs in or out), so the transport asks on every attempt and never caches.
/// `on_refresh_success` is invoked exactly once per successful refresh,
/// before any request is retried.
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, if any
    fn token(&self) -> Option<String>;

    /// Current API key, if any
    fn api_key(&self) -> Option<String>;

    /// Current refresh token, if any. `None` disables 401 recovery.
    fn refresh_token(&self) -> Option<String>;

    /// Store the credentials produced by a refresh.
    fn on_refresh_success(&self, outcome: &RefreshOutcome);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_outcome_deserializes_without_user() {
        let json = r#"{"access_token":"at_abc","refresh_token":"rt_def","expires_in":3600}"#;
        let outcome: RefreshOutcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.access_token, "at_abc");
        assert_eq!(outcome.refresh_token, "rt_def");
        assert_eq!(outcome.expires_in, 3600);
        assert!(outcome.user.is_none());
    }

    #[test]
    fn refresh_outcome_keeps_user_payload() {
        let json = r#"{"access_token":"a","refresh_token":"r","expires_in":60,"user":{"id":"usr_1"}}"#;
        let outcome: RefreshOutcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.user.unwrap()["id"], "usr_1");
    }
}
