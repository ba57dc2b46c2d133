//! TOTP enrollment

use authplatform_transport::{Method, RequestOptions, Result, Transport};
use serde_json::json;

use super::{fetch, send};
use crate::models::MfaEnrollment;

/// TOTP multi-factor authentication for the current user.
pub struct Mfa<'a> {
    transport: &'a Transport,
}

impl<'a> Mfa<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Start enrollment. MFA is active once `verify` succeeds.
    pub async fn enroll(&self) -> Result<MfaEnrollment> {
        fetch(
            self.transport,
            Method::Post,
            "mfa/enroll",
            RequestOptions::new(),
        )
        .await
    }

    /// Confirm a one-time code. A wrong code is a validation error.
    pub async fn verify(&self, code: &str) -> Result<()> {
        send(
            self.transport,
            Method::Post,
            "mfa/verify",
            RequestOptions::new().json(&json!({ "code": code })),
        )
        .await
    }

    pub async fn disable(&self) -> Result<()> {
        send(
            self.transport,
            Method::Post,
            "mfa/disable",
            RequestOptions::new(),
        )
        .await
    }
}
