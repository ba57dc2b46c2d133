//! OAuth 2.0 / OpenID Connect authorization code flow with PKCE
//!
//! These endpoints are not application-scoped and their responses are not
//! enveloped. Protocol errors come back as `{"error": "...",
//! "error_description": "..."}` and surface with `ErrorKind::Protocol`.

use authplatform_transport::{ApiError, ErrorKind, Method, RequestOptions, Result, Transport};
use reqwest::Url;
use serde::Serialize;

use crate::models::{TokenResponse, UserInfo};
use crate::pkce::{compute_challenge, generate_state, generate_verifier};

const AUTHORIZE_PATH: &str = "oauth/authorize";
const TOKEN_PATH: &str = "oauth/token";
const USERINFO_PATH: &str = "oauth/userinfo";

/// Inputs for building an authorization URL.
#[derive(Debug, Clone)]
pub struct AuthorizationParams {
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    /// Generated when `None`
    pub state: Option<String>,
    pub nonce: Option<String>,
}

impl AuthorizationParams {
    /// `openid profile email` scopes and a generated state.
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scopes: vec!["openid".into(), "profile".into(), "email".into()],
            state: None,
            nonce: None,
        }
    }
}

/// Where to send the user, plus the values needed to finish the flow.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    /// Compare with the `state` returned to the redirect URI
    pub state: String,
    /// Keep until `exchange_code`
    pub code_verifier: String,
}

/// Token request for the authorization code grant.
#[derive(Debug, Clone, Serialize)]
pub struct CodeExchange {
    pub code: String,
    pub redirect_uri: String,
    pub client_id: String,
    pub code_verifier: String,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    #[serde(flatten)]
    exchange: &'a CodeExchange,
}

pub struct Oidc<'a> {
    transport: &'a Transport,
}

impl<'a> Oidc<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Build the authorize URL with a fresh PKCE verifier (S256).
    pub fn authorization_url(&self, params: &AuthorizationParams) -> Result<AuthorizationRequest> {
        let base = self.transport.build_unscoped_url(AUTHORIZE_PATH);
        let mut url = Url::parse(&base).map_err(|e| {
            ApiError::new(
                ErrorKind::Unknown,
                "INVALID_URL",
                format!("invalid authorize URL {base}: {e}"),
                0,
            )
            .with_source(e)
        })?;

        let code_verifier = generate_verifier();
        let state = params.state.clone().unwrap_or_else(generate_state);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &params.client_id)
                .append_pair("redirect_uri", &params.redirect_uri)
                .append_pair("scope", &params.scopes.join(" "))
                .append_pair("state", &state)
                .append_pair("code_challenge", &compute_challenge(&code_verifier))
                .append_pair("code_challenge_method", "S256");
            if let Some(nonce) = &params.nonce {
                query.append_pair("nonce", nonce);
            }
        }

        Ok(AuthorizationRequest {
            url: url.into(),
            state,
            code_verifier,
        })
    }

    /// Exchange an authorization code for tokens. The tokens are returned,
    /// not stored.
    pub async fn exchange_code(&self, exchange: &CodeExchange) -> Result<TokenResponse> {
        let url = self.transport.build_unscoped_url(TOKEN_PATH);
        let body = TokenRequest {
            grant_type: "authorization_code",
            exchange,
        };
        self.transport
            .request_json(Method::Post, &url, RequestOptions::new().json(&body))
            .await
    }

    /// Claims for the current bearer token.
    pub async fn userinfo(&self) -> Result<UserInfo> {
        let url = self.transport.build_unscoped_url(USERINFO_PATH);
        self.transport
            .request_json(Method::Get, &url, RequestOptions::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client_for;
    use axum::Json;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use serde_json::{Value, json};
    use std::collections::HashMap;

    #[tokio::test]
    async fn authorization_url_carries_pkce() {
        let client = client_for(axum::Router::new()).await;
        let mut params = AuthorizationParams::new("cli_1", "https://app.example.com/callback");
        params.nonce = Some("n-1".into());

        let request = client.oidc().authorization_url(&params).unwrap();
        let url = Url::parse(&request.url).unwrap();
        assert_eq!(url.path(), "/oauth/authorize");

        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(query["response_type"], "code");
        assert_eq!(query["client_id"], "cli_1");
        assert_eq!(query["redirect_uri"], "https://app.example.com/callback");
        assert_eq!(query["scope"], "openid profile email");
        assert_eq!(query["state"], request.state);
        assert_eq!(query["nonce"], "n-1");
        assert_eq!(query["code_challenge_method"], "S256");
        assert_eq!(
            query["code_challenge"],
            compute_challenge(&request.code_verifier)
        );
    }

    #[tokio::test]
    async fn explicit_state_is_kept() {
        let client = client_for(axum::Router::new()).await;
        let mut params = AuthorizationParams::new("cli_1", "https://app.example.com/cb");
        params.state = Some("xyz".into());
        let request = client.oidc().authorization_url(&params).unwrap();
        assert_eq!(request.state, "xyz");
    }

    fn exchange(code: &str) -> CodeExchange {
        CodeExchange {
            code: code.into(),
            redirect_uri: "https://app.example.com/callback".into(),
            client_id: "cli_1".into(),
            code_verifier: "verifier".into(),
        }
    }

    fn router() -> axum::Router {
        axum::Router::new()
            .route(
                "/oauth/token",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["grant_type"], "authorization_code");
                    assert_eq!(body["code_verifier"], "verifier");
                    if body["code"] == "good" {
                        Json(json!({
                            "access_token": "at_oidc",
                            "token_type": "Bearer",
                            "expires_in": 3600,
                            "id_token": "eyJ..."
                        }))
                        .into_response()
                    } else {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(json!({
                                "error": "invalid_grant",
                                "error_description": "Authorization code expired"
                            })),
                        )
                            .into_response()
                    }
                }),
            )
            .route(
                "/oauth/userinfo",
                get(|headers: HeaderMap| async move {
                    assert_eq!(headers["authorization"], "Bearer at_oidc");
                    Json(json!({"sub": "usr_1", "email": "ada@example.com", "locale": "en"}))
                }),
            )
    }

    #[tokio::test]
    async fn exchange_code_and_userinfo() {
        let client = client_for(router()).await;

        let tokens = client.oidc().exchange_code(&exchange("good")).await.unwrap();
        assert_eq!(tokens.access_token, "at_oidc");
        assert_eq!(tokens.token_type.as_deref(), Some("Bearer"));
        assert!(tokens.refresh_token.is_none());

        client.set_token(tokens.access_token);
        let info = client.oidc().userinfo().await.unwrap();
        assert_eq!(info.sub, "usr_1");
        assert_eq!(info.claims["locale"], "en");
    }

    #[tokio::test]
    async fn invalid_grant_is_protocol_error() {
        let client = client_for(router()).await;

        let err = client.oidc().exchange_code(&exchange("stale")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(err.code(), "invalid_grant");
        assert_eq!(err.message(), "Authorization code expired");
        assert_eq!(err.status(), 400);
    }
}
