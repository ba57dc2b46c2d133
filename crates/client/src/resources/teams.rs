//! Teams and team membership

use authplatform_transport::{Method, RequestOptions, Result, Transport};
use serde::Serialize;
use serde_json::json;

use super::{fetch, segment, send};
use crate::envelope::{ListParams, Paginated};
use crate::models::{Team, TeamMember};

pub struct Teams<'a> {
    transport: &'a Transport,
}

impl<'a> Teams<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self, params: ListParams) -> Result<Paginated<Team>> {
        let url = self.transport.build_scoped_url("teams");
        self.transport
            .request_json(Method::Get, &url, params.apply(RequestOptions::new()))
            .await
    }

    pub async fn get(&self, team_id: &str) -> Result<Team> {
        fetch(self.transport, Method::Get, &team_path(team_id), RequestOptions::new()).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<Team> {
        fetch(
            self.transport,
            Method::Post,
            "teams",
            RequestOptions::new().json(body),
        )
        .await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, team_id: &str, body: &B) -> Result<Team> {
        fetch(
            self.transport,
            Method::Patch,
            &team_path(team_id),
            RequestOptions::new().json(body),
        )
        .await
    }

    pub async fn delete(&self, team_id: &str) -> Result<()> {
        send(
            self.transport,
            Method::Delete,
            &team_path(team_id),
            RequestOptions::new(),
        )
        .await
    }

    /// Add `user_id` to the team, optionally with a team role.
    pub async fn add_member(
        &self,
        team_id: &str,
        user_id: &str,
        role: Option<&str>,
    ) -> Result<TeamMember> {
        let path = format!("{}/members", team_path(team_id));
        let mut body = json!({ "user_id": user_id });
        if let Some(role) = role {
            body["role"] = role.into();
        }
        fetch(
            self.transport,
            Method::Post,
            &path,
            RequestOptions::new().json(&body),
        )
        .await
    }

    pub async fn remove_member(&self, team_id: &str, user_id: &str) -> Result<()> {
        let path = format!("{}/members/{}", team_path(team_id), segment(user_id));
        send(self.transport, Method::Delete, &path, RequestOptions::new()).await
    }
}

fn team_path(team_id: &str) -> String {
    format!("teams/{}", segment(team_id))
}
