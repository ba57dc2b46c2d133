//! Roles and their assignment to users

use authplatform_transport::{Method, RequestOptions, Result, Transport};
use serde::Serialize;
use serde_json::json;

use super::{fetch, segment, send};
use crate::envelope::{ListParams, Paginated};
use crate::models::Role;

/// Roles and their assignment to users.
pub struct Roles<'a> {
    transport: &'a Transport,
}

impl<'a> Roles<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self, params: ListParams) -> Result<Paginated<Role>> {
        let url = self.transport.build_scoped_url("roles");
        self.transport
            .request_json(Method::Get, &url, params.apply(RequestOptions::new()))
            .await
    }

    pub async fn get(&self, role_id: &str) -> Result<Role> {
        let path = format!("roles/{}", segment(role_id));
        fetch(self.transport, Method::Get, &path, RequestOptions::new()).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<Role> {
        fetch(
            self.transport,
            Method::Post,
            "roles",
            RequestOptions::new().json(body),
        )
        .await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, role_id: &str, body: &B) -> Result<Role> {
        let path = format!("roles/{}", segment(role_id));
        fetch(
            self.transport,
            Method::Patch,
            &path,
            RequestOptions::new().json(body),
        )
        .await
    }

    pub async fn delete(&self, role_id: &str) -> Result<()> {
        let path = format!("roles/{}", segment(role_id));
        send(self.transport, Method::Delete, &path, RequestOptions::new()).await
    }

    /// Grant `role_id` to `user_id`.
    pub async fn assign(&self, user_id: &str, role_id: &str) -> Result<()> {
        let path = format!("users/{}/roles", segment(user_id));
        send(
            self.transport,
            Method::Post,
            &path,
            RequestOptions::new().json(&json!({ "role_id": role_id })),
        )
        .await
    }

    /// Remove `role_id` from `user_id`.
    pub async fn revoke(&self, user_id: &str, role_id: &str) -> Result<()> {
        let path = format!("users/{}/roles/{}", segment(user_id), segment(role_id));
        send(self.transport, Method::Delete, &path, RequestOptions::new()).await
    }
}
