//! Permission catalogue and checks

use authplatform_transport::{Method, RequestOptions, Result, Transport};

use super::{fetch, segment};
use crate::models::{Permission, PermissionCheck};

/// Permission catalogue and checks.
pub struct Permissions<'a> {
    transport: &'a Transport,
}

impl<'a> Permissions<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Permission>> {
        fetch(
            self.transport,
            Method::Get,
            "permissions",
            RequestOptions::new(),
        )
        .await
    }

    /// Whether `user_id` holds `permission`, as evaluated by the platform.
    pub async fn check(&self, user_id: &str, permission: &str) -> Result<bool> {
        let path = format!("users/{}/permissions/check", segment(user_id));
        let check: PermissionCheck = fetch(
            self.transport,
            Method::Get,
            &path,
            RequestOptions::new().query("permission", permission),
        )
        .await?;
        Ok(check.allowed)
    }
}
