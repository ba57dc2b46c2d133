//! WebAuthn passkeys
//!
//! The option objects are passed through untouched so they can be handed to
//! the browser's `navigator.credentials` API as-is.

use authplatform_transport::{Method, RequestOptions, Result, Transport};
use provider::MemoryCredentials;
use serde_json::{Value, json};
use tracing::info;

use super::{fetch, segment, send};
use crate::models::{AuthSession, Passkey};

pub struct Passkeys<'a> {
    transport: &'a Transport,
    credentials: &'a MemoryCredentials,
}

impl<'a> Passkeys<'a> {
    pub(crate) fn new(transport: &'a Transport, credentials: &'a MemoryCredentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub async fn list(&self) -> Result<Vec<Passkey>> {
        fetch(self.transport, Method::Get, "passkeys", RequestOptions::new()).await
    }

    /// Creation options for the signed-in user.
    pub async fn registration_options(&self) -> Result<Value> {
        fetch(
            self.transport,
            Method::Post,
            "passkeys/register/options",
            RequestOptions::new(),
        )
        .await
    }

    /// Submit the browser's attestation and store the new passkey.
    pub async fn register(&self, credential: &Value, name: Option<&str>) -> Result<Passkey> {
        fetch(
            self.transport,
            Method::Post,
            "passkeys/register/verify",
            RequestOptions::new().json(&json!({ "credential": credential, "name": name })),
        )
        .await
    }

    /// Request options for signing in. `email` narrows the allowed credentials.
    pub async fn authentication_options(&self, email: Option<&str>) -> Result<Value> {
        let options = match email {
            Some(email) => RequestOptions::new().json(&json!({ "email": email })),
            None => RequestOptions::new(),
        };
        fetch(
            self.transport,
            Method::Post,
            "passkeys/authenticate/options",
            options,
        )
        .await
    }

    /// Verify an assertion. On success the returned tokens are stored like `login`.
    pub async fn authenticate(&self, credential: &Value) -> Result<AuthSession> {
        let session: AuthSession = fetch(
            self.transport,
            Method::Post,
            "passkeys/authenticate/verify",
            RequestOptions::new().json(&json!({ "credential": credential })),
        )
        .await?;
        self.credentials.store(
            session.access_token.clone(),
            session.refresh_token.clone(),
            session.expires_in,
        );
        info!("logged in with passkey");
        Ok(session)
    }

    pub async fn delete(&self, passkey_id: &str) -> Result<()> {
        let path = format!("passkeys/{}", segment(passkey_id));
        send(self.transport, Method::Delete, &path, RequestOptions::new()).await
    }
}
