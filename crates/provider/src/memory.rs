//! In-memory credential storage owned by the caller-facing client
//!
//! Holds the bearer token, API key and refresh token behind a `RwLock`.
//! Reads clone the current value so header building never holds the lock;
//! writes come from the caller (login/logout) or from the transport after a
//! refresh.

use std::sync::{PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::{CredentialProvider, RefreshOutcome};

#[derive(Debug, Default)]
struct State {
    token: Option<String>,
    api_key: Option<String>,
    refresh_token: Option<String>,
    /// Access token expiry as unix milliseconds
    expires_at: Option<u64>,
}

/// Thread-safe credential holder for one client instance.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    state: RwLock<State>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an API key (server-to-server usage).
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let credentials = Self::new();
        credentials.set_api_key(Some(api_key.into()));
        credentials
    }

    pub fn set_token(&self, token: Option<String>) {
        self.write(|s| s.token = token);
    }

    pub fn set_api_key(&self, api_key: Option<String>) {
        self.write(|s| s.api_key = api_key);
    }

    pub fn set_refresh_token(&self, refresh_token: Option<String>) {
        self.write(|s| s.refresh_token = refresh_token);
    }

    /// Store a full token set, e.g. from a login response.
    pub fn store(&self, access: String, refresh: Option<String>, expires_in: Option<u64>) {
        let expires_at =
            expires_in.map(|secs| secs.saturating_mul(1000).saturating_add(now_millis()));
        self.write(|s| {
            s.token = Some(access);
            s.refresh_token = refresh;
            s.expires_at = expires_at;
        });
        debug!("stored access token");
    }

    /// Forget the bearer and refresh tokens. The API key is kept.
    pub fn clear_tokens(&self) {
        self.write(|s| {
            s.token = None;
            s.refresh_token = None;
            s.expires_at = None;
        });
        debug!("cleared tokens");
    }

    /// Access token expiry as unix milliseconds, when known.
    pub fn expires_at(&self) -> Option<u64> {
        self.read(|s| s.expires_at)
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write(&self, f: impl FnOnce(&mut State)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }
}

impl CredentialProvider for MemoryCredentials {
    fn token(&self) -> Option<String> {
        self.read(|s| s.token.clone())
    }

    fn api_key(&self) -> Option<String> {
        self.read(|s| s.api_key.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.read(|s| s.refresh_token.clone())
    }

    fn on_refresh_success(&self, outcome: &RefreshOutcome) {
        self.store(
            outcome.access_token.clone(),
            Some(outcome.refresh_token.clone()),
            Some(outcome.expires_in),
        );
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
