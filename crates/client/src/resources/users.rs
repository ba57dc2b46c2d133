//! User administration

use authplatform_transport::{Method, RequestOptions, Result, Transport};
use serde::Serialize;

use super::{fetch, segment, send};
use crate::envelope::{ListParams, Paginated};
use crate::models::User;

/// User administration.
pub struct Users<'a> {
    transport: &'a Transport,
}

impl<'a> Users<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self, params: ListParams) -> Result<Paginated<User>> {
        let url = self.transport.build_scoped_url("users");
        self.transport
            .request_json(Method::Get, &url, params.apply(RequestOptions::new()))
            .await
    }

    pub async fn get(&self, user_id: &str) -> Result<User> {
        let path = format!("users/{}", segment(user_id));
        fetch(self.transport, Method::Get, &path, RequestOptions::new()).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<User> {
        fetch(
            self.transport,
            Method::Post,
            "users",
            RequestOptions::new().json(body),
        )
        .await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, user_id: &str, body: &B) -> Result<User> {
        let path = format!("users/{}", segment(user_id));
        fetch(
            self.transport,
            Method::Patch,
            &path,
            RequestOptions::new().json(body),
        )
        .await
    }

    pub async fn delete(&self, user_id: &str) -> Result<()> {
        let path = format!("users/{}", segment(user_id));
        send(self.transport, Method::Delete, &path, RequestOptions::new()).await
    }
}

#[cfg(test)]
mod tests {
    use crate::ErrorKind;
    use crate::envelope::ListParams;
    use crate::test_support::{client_for, scoped};
    use axum::Json;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use serde_json::{Value, json};
    use std::collections::HashMap;

    fn router() -> axum::Router {
        axum::Router::new()
            .route(
                &scoped("users"),
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    assert_eq!(q.get("page").map(String::as_str), Some("2"));
                    assert_eq!(q.get("per_page").map(String::as_str), Some("1"));
                    assert!(!q.contains_key("search"));
                    Json(json!({
                        "data": [{"id": "usr_1", "email": "ada@example.com"}],
                        "meta": {"total": 3, "per_page": 1, "current_page": 2, "last_page": 3}
                    }))
                })
                .post(|Json(body): Json<Value>| async move {
                    (
                        StatusCode::CREATED,
                        Json(json!({"data": {"id": "usr_new", "email": body["email"]}})),
                    )
                }),
            )
            .route(
                &scoped("users/{id}"),
                get(|Path(id): Path<String>| async move {
                    if id == "usr_1" {
                        Json(json!({"data": {"id": "usr_1", "email": "ada@example.com"}}))
                            .into_response()
                    } else {
                        (
                            StatusCode::NOT_FOUND,
                            Json(json!({"error": {"message": "User not found", "code": "USER_NOT_FOUND"}})),
                        )
                            .into_response()
                    }
                })
                .patch(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                    Json(json!({"data": {"id": id, "email": "ada@example.com", "name": body["name"]}}))
                })
                .delete(|| async { StatusCode::NO_CONTENT }),
            )
    }

    #[tokio::test]
    async fn list_paginates() {
        let client = client_for(router()).await;
        let page = client
            .users()
            .list(ListParams::new().page(2).per_page(1))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.meta.total, Some(3));
        assert!(page.has_more());
    }

    #[tokio::test]
    async fn crud() {
        let client = client_for(router()).await;
        let users = client.users();

        let created = users
            .create(&json!({"email": "grace@example.com", "password": "pw"}))
            .await
            .unwrap();
        assert_eq!(created.id, "usr_new");
        assert_eq!(created.email, "grace@example.com");

        assert_eq!(users.get("usr_1").await.unwrap().email, "ada@example.com");

        let updated = users.update("usr_1", &json!({"name": "Ada L."})).await.unwrap();
        assert_eq!(updated.name.as_deref(), Some("Ada L."));

        users.delete("usr_1").await.unwrap();
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let client = client_for(router()).await;
        let err = client.users().get("usr_missing").await.unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.code(), "USER_NOT_FOUND");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn reserved_characters_stay_in_one_segment() {
        let client = client_for(router()).await;
        let updated = client
            .users()
            .update("ext/42?x=1#frag", &json!({"name": "Ext"}))
            .await
            .unwrap();
        assert_eq!(updated.id, "ext/42?x=1#frag");
    }
}
