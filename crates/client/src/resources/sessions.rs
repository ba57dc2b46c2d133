//! Active session listing and revocation

use authplatform_transport::{Method, RequestOptions, Result, Transport};

use super::{fetch, segment, send};
use crate::models::Session;

/// Sessions of the authenticated user.
pub struct Sessions<'a> {
    transport: &'a Transport,
}

impl<'a> Sessions<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Session>> {
        fetch(self.transport, Method::Get, "sessions", RequestOptions::new()).await
    }

    pub async fn revoke(&self, session_id: &str) -> Result<()> {
        let path = format!("sessions/{}", segment(session_id));
        send(self.transport, Method::Delete, &path, RequestOptions::new()).await
    }

    /// Revoke every session except the current one.
    pub async fn revoke_all(&self) -> Result<()> {
        send(
            self.transport,
            Method::Delete,
            "sessions",
            RequestOptions::new(),
        )
        .await
    }
}
