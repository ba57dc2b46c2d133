//! SAML single sign-on through the application's identity providers

use authplatform_transport::{Method, RequestOptions, Result, Transport};
use provider::MemoryCredentials;
use serde_json::json;
use tracing::info;

use super::{fetch, segment};
use crate::models::{AuthSession, SamlLogin, SamlProvider};

pub struct Saml<'a> {
    transport: &'a Transport,
    credentials: &'a MemoryCredentials,
}

impl<'a> Saml<'a> {
    pub(crate) fn new(transport: &'a Transport, credentials: &'a MemoryCredentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub async fn providers(&self) -> Result<Vec<SamlProvider>> {
        fetch(
            self.transport,
            Method::Get,
            "saml/providers",
            RequestOptions::new(),
        )
        .await
    }

    pub async fn provider(&self, provider_id: &str) -> Result<SamlProvider> {
        let path = format!("saml/providers/{}", segment(provider_id));
        fetch(self.transport, Method::Get, &path, RequestOptions::new()).await
    }

    /// Start sign-in. `relay_state` comes back unchanged with the assertion.
    pub async fn login(&self, provider_id: &str, relay_state: Option<&str>) -> Result<SamlLogin> {
        let path = format!("saml/providers/{}/login", segment(provider_id));
        fetch(
            self.transport,
            Method::Get,
            &path,
            RequestOptions::new().query_opt("relay_state", relay_state),
        )
        .await
    }

    /// Exchange the IdP's `SAMLResponse` for tokens and store them.
    pub async fn acs(&self, provider_id: &str, saml_response: &str) -> Result<AuthSession> {
        let path = format!("saml/providers/{}/acs", segment(provider_id));
        let session: AuthSession = fetch(
            self.transport,
            Method::Post,
            &path,
            RequestOptions::new().json(&json!({ "SAMLResponse": saml_response })),
        )
        .await?;
        self.credentials.store(
            session.access_token.clone(),
            session.refresh_token.clone(),
            session.expires_in,
        );
        info!(provider_id, "logged in with SAML");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use crate::ErrorKind;
    use crate::test_support::{client_for, scoped};
    use axum::Json;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use provider::CredentialProvider;
    use serde_json::{Value, json};
    use std::collections::HashMap;

    fn router() -> axum::Router {
        axum::Router::new()
            .route(
                &scoped("saml/providers"),
                get(|| async {
                    Json(json!({"data": [
                        {"id": "okta", "name": "Okta", "entity_id": "http://www.okta.com/x1"},
                        {"id": "adfs", "name": "ADFS", "enabled": false}
                    ]}))
                }),
            )
            .route(
                &scoped("saml/providers/{id}"),
                get(|Path(id): Path<String>| async move {
                    if id == "okta" {
                        Json(json!({"data": {"id": "okta", "name": "Okta"}})).into_response()
                    } else {
                        (
                            StatusCode::NOT_FOUND,
                            Json(json!({"message": "Provider not found"})),
                        )
                            .into_response()
                    }
                }),
            )
            .route(
                &scoped("saml/providers/{id}/login"),
                get(
                    |Path(id): Path<String>, Query(q): Query<HashMap<String, String>>| async move {
                        let state = q.get("relay_state").cloned().unwrap_or_default();
                        Json(json!({"data": {
                            "redirect_url": format!("https://idp.example.com/sso/{id}?RelayState={state}")
                        }}))
                    },
                ),
            )
            .route(
                &scoped("saml/providers/{id}/acs"),
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["SAMLResponse"], "PHNhbWxwOlJlc3BvbnNlLz4=");
                    Json(json!({"data": {"access_token": "at_saml", "expires_in": 600}}))
                }),
            )
    }

    #[tokio::test]
    async fn lists_and_gets_providers() {
        let client = client_for(router()).await;
        let saml = client.saml();

        let providers = saml.providers().await.unwrap();
        assert_eq!(providers.len(), 2);
        assert!(providers[0].enabled);
        assert!(!providers[1].enabled);

        assert_eq!(saml.provider("okta").await.unwrap().name, "Okta");
        let err = saml.provider("missing").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn login_then_acs_stores_tokens() {
        let client = client_for(router()).await;
        let saml = client.saml();

        let login = saml.login("okta", Some("after-login")).await.unwrap();
        assert_eq!(
            login.redirect_url,
            "https://idp.example.com/sso/okta?RelayState=after-login"
        );

        let session = saml.acs("okta", "PHNhbWxwOlJlc3BvbnNlLz4=").await.unwrap();
        assert_eq!(session.access_token, "at_saml");
        assert_eq!(client.credentials().token().as_deref(), Some("at_saml"));
        assert!(client.credentials().refresh_token().is_none());
    }
}
