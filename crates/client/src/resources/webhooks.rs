//! Webhook endpoint management

use authplatform_transport::{Method, RequestOptions, Result, Transport};
use serde::Serialize;

use super::{fetch, segment, send};
use crate::models::Webhook;

/// Webhook endpoint registration. Deliveries are checked with
/// [`crate::webhook::verify_signature`].
pub struct Webhooks<'a> {
    transport: &'a Transport,
}

impl<'a> Webhooks<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Webhook>> {
        fetch(self.transport, Method::Get, "webhooks", RequestOptions::new()).await
    }

    pub async fn get(&self, webhook_id: &str) -> Result<Webhook> {
        let path = format!("webhooks/{}", segment(webhook_id));
        fetch(self.transport, Method::Get, &path, RequestOptions::new()).await
    }

    /// Register an endpoint. The response is the only place the signing
    /// secret is returned.
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<Webhook> {
        fetch(
            self.transport,
            Method::Post,
            "webhooks",
            RequestOptions::new().json(body),
        )
        .await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, webhook_id: &str, body: &B) -> Result<Webhook> {
        let path = format!("webhooks/{}", segment(webhook_id));
        fetch(
            self.transport,
            Method::Patch,
            &path,
            RequestOptions::new().json(body),
        )
        .await
    }

    pub async fn delete(&self, webhook_id: &str) -> Result<()> {
        let path = format!("webhooks/{}", segment(webhook_id));
        send(self.transport, Method::Delete, &path, RequestOptions::new()).await
    }
}
