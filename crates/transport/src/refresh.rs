//! Coordinated token refresh
//!
//! At most one refresh call is outstanding at any time. The first request
//! that needs a refresh installs a shared future in the slot; every request
//! arriving while it is pending clones and awaits the same future, so they
//! all observe one outcome. Once resolved, the slot is cleared by whichever
//! waiter gets there first (only if it still holds that same future).
//!
//! The slot lock is only held to inspect or swap the handle, never across
//! the refresh itself.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use provider::RefreshOutcome;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{ApiError, Result};

type PendingRefresh = Shared<BoxFuture<'static, Result<RefreshOutcome>>>;

/// Body sent to the refresh endpoint.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshEnvelope {
    data: RefreshOutcome,
}

/// Decode the refresh endpoint's `{"data": {...}}` envelope.
pub fn parse_refresh_response(value: Option<serde_json::Value>) -> Result<RefreshOutcome> {
    let value = value.ok_or_else(|| ApiError::invalid_response("empty refresh response"))?;
    serde_json::from_value::<RefreshEnvelope>(value)
        .map(|envelope| envelope.data)
        .map_err(|e| {
            ApiError::invalid_response(format!("invalid refresh response: {e}")).with_source(e)
        })
}

/// Single-flight slot for the pending refresh.
#[derive(Default)]
pub struct RefreshCoordinator {
    pending: Mutex<Option<PendingRefresh>>,
    started: AtomicU64,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the pending refresh, or start one with `start` if none is pending.
    ///
    /// `start` is only called by the request that creates the refresh; it
    /// must produce a future that performs the whole refresh (network call
    /// and credential update) so side effects happen exactly once.
    pub async fn run<F>(&self, start: F) -> Result<RefreshOutcome>
    where
        F: FnOnce() -> BoxFuture<'static, Result<RefreshOutcome>>,
    {
        let refresh = {
            let mut slot = self.pending.lock().await;
            match slot.as_ref() {
                // A resolved handle still in the slot belongs to a finished
                // refresh whose waiters have not cleared it yet.
                Some(pending) if pending.peek().is_none() => {
                    debug!("joining in-flight token refresh");
                    pending.clone()
                }
                _ => {
                    let count = self.started.fetch_add(1, Ordering::Relaxed) + 1;
                    debug!(refresh = count, "starting token refresh");
                    let pending = start().shared();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        let result = refresh.clone().await;

        let mut slot = self.pending.lock().await;
        if slot.as_ref().is_some_and(|p| p.ptr_eq(&refresh)) {
            *slot = None;
        }
        result
    }

    /// Whether a refresh is currently pending.
    pub async fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .await
            .as_ref()
            .is_some_and(|p| p.peek().is_none())
    }

    /// Number of refreshes started since creation.
    pub fn started(&self) -> u64 {
        self.started.load(Ordering::Relaxed)
    }
}
