//! Fixed credentials with no refresh capability.
//!
//! Useful for server-to-server callers that only hold an API key, and for
//! tests. Refresh outcomes are ignored since there is nowhere to keep them.

use tracing::debug;

use crate::{CredentialProvider, RefreshOutcome};

/// Credentials that never change after construction.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    token: Option<String>,
    api_key: Option<String>,
}

impl StaticCredentials {
    pub fn from_bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            api_key: None,
        }
    }

    pub fn from_api_key(api_key: impl Into<String>) -> Self {
        Self {
            token: None,
            api_key: Some(api_key.into()),
        }
    }

    /// No credentials at all; requests go out unauthenticated.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl CredentialProvider for StaticCredentials {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }

    fn api_key(&self) -> Option<String> {
        self.api_key.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        None
    }

    fn on_refresh_success(&self, _outcome: &RefreshOutcome) {
        debug!("static credentials ignore refresh outcome");
    }
}
