//! Application API keys

use authplatform_transport::{Method, RequestOptions, Result, Transport};
use serde::Serialize;

use super::{fetch, segment, send};
use crate::models::ApiKey;

/// Server-to-server API keys for the application.
pub struct ApiKeys<'a> {
    transport: &'a Transport,
}

impl<'a> ApiKeys<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<ApiKey>> {
        fetch(self.transport, Method::Get, "api-keys", RequestOptions::new()).await
    }

    /// Create a key. `ApiKey::key` holds the full secret in this response only.
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<ApiKey> {
        fetch(
            self.transport,
            Method::Post,
            "api-keys",
            RequestOptions::new().json(body),
        )
        .await
    }

    pub async fn revoke(&self, key_id: &str) -> Result<()> {
        let path = format!("api-keys/{}", segment(key_id));
        send(self.transport, Method::Delete, &path, RequestOptions::new()).await
    }
}
