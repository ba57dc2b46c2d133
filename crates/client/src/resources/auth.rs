//! Password login and account lifecycle

use authplatform_transport::{Method, RequestOptions, Result, Transport};
use provider::{MemoryCredentials, RefreshOutcome};
use serde_json::json;
use tracing::{debug, info};

use super::{fetch, send};
use crate::models::{AuthSession, LoginRequest, RegisterRequest, User};

/// Login, registration and account recovery.
///
/// Successful `login` and `refresh` store the returned tokens in the
/// client's credentials; `logout` clears them.
pub struct Auth<'a> {
    transport: &'a Transport,
    credentials: &'a MemoryCredentials,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(transport: &'a Transport, credentials: &'a MemoryCredentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let session: AuthSession = fetch(
            self.transport,
            Method::Post,
            "users/login",
            RequestOptions::new().json(&LoginRequest { email, password }),
        )
        .await?;
        self.credentials.store(
            session.access_token.clone(),
            session.refresh_token.clone(),
            session.expires_in,
        );
        info!("logged in");
        Ok(session)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        fetch(
            self.transport,
            Method::Post,
            "users/register",
            RequestOptions::new().json(request),
        )
        .await
    }

    /// End the server session. Local tokens are cleared even if the call fails.
    pub async fn logout(&self) -> Result<()> {
        let result = send(
            self.transport,
            Method::Post,
            "users/logout",
            RequestOptions::new(),
        )
        .await;
        self.credentials.clear_tokens();
        debug!("logged out");
        result
    }

    pub async fn me(&self) -> Result<User> {
        fetch(self.transport, Method::Get, "users/me", RequestOptions::new()).await
    }

    /// Refresh the access token now, joining any refresh already running.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        self.transport.refresh_now().await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        send(
            self.transport,
            Method::Post,
            "users/password/forgot",
            RequestOptions::new().json(&json!({ "email": email })),
        )
        .await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<()> {
        send(
            self.transport,
            Method::Post,
            "users/password/reset",
            RequestOptions::new().json(&json!({ "token": token, "password": password })),
        )
        .await
    }

    pub async fn verify_email(&self, token: &str) -> Result<()> {
        send(
            self.transport,
            Method::Post,
            "users/email/verify",
            RequestOptions::new().json(&json!({ "token": token })),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::ErrorKind;
    use crate::models::RegisterRequest;
    use crate::test_support::{client_for, scoped};
    use axum::Json;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use provider::CredentialProvider;
    use serde_json::{Value, json};

    fn user() -> Value {
        json!({"id": "usr_1", "email": "ada@example.com", "name": "Ada"})
    }

    #[tokio::test]
    async fn login_stores_tokens() {
        let router = axum::Router::new().route(
            &scoped("users/login"),
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body, json!({"email": "ada@example.com", "password": "pw"}));
                Json(json!({"data": {
                    "access_token": "at_1",
                    "refresh_token": "rt_1",
                    "expires_in": 900,
                    "user": user(),
                }}))
            }),
        );
        let client = client_for(router).await;

        let session = client.auth().login("ada@example.com", "pw").await.unwrap();
        assert_eq!(session.user.unwrap().id, "usr_1");
        assert_eq!(client.credentials().token().as_deref(), Some("at_1"));
        assert_eq!(client.credentials().refresh_token().as_deref(), Some("rt_1"));
        assert!(client.credentials().expires_at().is_some());
    }

    #[tokio::test]
    async fn failed_login_keeps_credentials_empty() {
        let router = axum::Router::new().route(
            &scoped("users/login"),
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": {
                        "message": "Invalid credentials",
                        "code": "AUTH_INVALID_CREDENTIALS"
                    }})),
                )
            }),
        );
        let client = client_for(router).await;

        let err = client.auth().login("ada@example.com", "bad").await.unwrap_err();
        assert_eq!(err.code(), "AUTH_INVALID_CREDENTIALS");
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(client.credentials().token().is_none());
    }

    #[tokio::test]
    async fn register_returns_user() {
        let router = axum::Router::new().route(
            &scoped("users/register"),
            post(|Json(body): Json<Value>| async move {
                assert!(body.get("name").is_none());
                (StatusCode::CREATED, Json(json!({"data": user()})))
            }),
        );
        let client = client_for(router).await;

        let request = RegisterRequest {
            email: "ada@example.com".into(),
            password: "pw".into(),
            name: None,
        };
        let created = client.auth().register(&request).await.unwrap();
        assert_eq!(created.email, "ada@example.com");
    }

    #[tokio::test]
    async fn me_sends_bearer() {
        let router = axum::Router::new().route(
            &scoped("users/me"),
            get(|headers: HeaderMap| async move {
                assert_eq!(headers["authorization"], "Bearer at_1");
                Json(json!({"data": user()}))
            }),
        );
        let client = client_for(router).await;
        client.set_token("at_1");

        let me = client.auth().me().await.unwrap();
        assert_eq!(me.name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn logout_clears_tokens_even_on_failure() {
        let router = axum::Router::new().route(
            &scoped("users/logout"),
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let client = client_for(router).await;
        client.set_token("at_1");
        client.set_api_key("ak_1");

        let err = client.auth().logout().await.unwrap_err();
        assert_eq!(err.status(), 500);
        assert!(client.credentials().token().is_none());
        assert_eq!(client.credentials().api_key().as_deref(), Some("ak_1"));
    }

    #[tokio::test]
    async fn refresh_stores_new_tokens() {
        let router = axum::Router::new().route(
            &scoped("users/token/refresh"),
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["refresh_token"], "rt_1");
                Json(json!({"data": {
                    "access_token": "at_2",
                    "refresh_token": "rt_2",
                    "expires_in": 900
                }}))
            }),
        );
        let client = client_for(router).await;
        client.set_refresh_token("rt_1");

        let outcome = client.auth().refresh().await.unwrap();
        assert_eq!(outcome.access_token, "at_2");
        assert_eq!(client.credentials().token().as_deref(), Some("at_2"));
        assert_eq!(client.credentials().refresh_token().as_deref(), Some("rt_2"));
    }

    #[tokio::test]
    async fn password_reset_flow() {
        let router = axum::Router::new()
            .route(
                &scoped("users/password/forgot"),
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["email"], "ada@example.com");
                    StatusCode::NO_CONTENT
                }),
            )
            .route(
                &scoped("users/password/reset"),
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body, json!({"token": "tok", "password": "new-pw"}));
                    Json(json!({"data": {"message": "Password reset"}}))
                }),
            )
            .route(
                &scoped("users/email/verify"),
                post(|| async {
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        Json(json!({
                            "message": "Validation failed",
                            "errors": {"token": ["The token has expired."]}
                        })),
                    )
                }),
            );
        let client = client_for(router).await;

        client.auth().forgot_password("ada@example.com").await.unwrap();
        client.auth().reset_password("tok", "new-pw").await.unwrap();
        let err = client.auth().verify_email("old").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.field_errors("token").unwrap(),
            &["The token has expired.".to_string()]
        );
    }
}
