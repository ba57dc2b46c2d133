//! Caller-facing client
//!
//! Owns the credential store and the transport, and hands out the resource
//! facades. Cloning is cheap and clones share credentials.

use std::sync::Arc;

use authplatform_transport::Transport;
use common::ClientConfig;
use provider::MemoryCredentials;
use tracing::debug;

use crate::resources::{
    ApiKeys, AuditLogs, Auth, Mfa, Oidc, Passkeys, Permissions, Roles, Saml, Sessions, Teams,
    Users, Webhooks,
};

#[derive(Clone)]
pub struct Client {
    credentials: Arc<MemoryCredentials>,
    transport: Arc<Transport>,
}

impl Client {
    /// Validate `config` and build a client seeded with its API key.
    pub fn new(config: ClientConfig) -> common::Result<Self> {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Like `new`, with a preconfigured reqwest client.
    pub fn with_http_client(
        http: reqwest::Client,
        mut config: ClientConfig,
    ) -> common::Result<Self> {
        config.validate()?;
        let credentials = Arc::new(match &config.api_key {
            Some(key) => MemoryCredentials::with_api_key(key.expose().as_str()),
            None => MemoryCredentials::new(),
        });
        let transport = Transport::with_http_client(http, &config, credentials.clone());
        debug!(
            base_url = %config.base_url,
            application_id = %config.application_id,
            "client created"
        );
        Ok(Self {
            credentials,
            transport: Arc::new(transport),
        })
    }

    /// Load config from `path`, `AUTHPLATFORM_CONFIG` or `authplatform.toml`.
    pub fn from_config_file(path: Option<&str>) -> common::Result<Self> {
        let path = ClientConfig::resolve_path(path);
        Self::new(ClientConfig::load(&path)?)
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.credentials.set_token(Some(token.into()));
    }

    pub fn set_api_key(&self, api_key: impl Into<String>) {
        self.credentials.set_api_key(Some(api_key.into()));
    }

    pub fn set_refresh_token(&self, refresh_token: impl Into<String>) {
        self.credentials.set_refresh_token(Some(refresh_token.into()));
    }

    /// Forget bearer and refresh tokens; the API key stays.
    pub fn clear_tokens(&self) {
        self.credentials.clear_tokens();
    }

    pub fn credentials(&self) -> &MemoryCredentials {
        &self.credentials
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth::new(&self.transport, &self.credentials)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(&self.transport)
    }

    pub fn roles(&self) -> Roles<'_> {
        Roles::new(&self.transport)
    }

    pub fn permissions(&self) -> Permissions<'_> {
        Permissions::new(&self.transport)
    }

    pub fn sessions(&self) -> Sessions<'_> {
        Sessions::new(&self.transport)
    }

    pub fn mfa(&self) -> Mfa<'_> {
        Mfa::new(&self.transport)
    }

    pub fn passkeys(&self) -> Passkeys<'_> {
        Passkeys::new(&self.transport, &self.credentials)
    }

    pub fn saml(&self) -> Saml<'_> {
        Saml::new(&self.transport, &self.credentials)
    }

    pub fn oidc(&self) -> Oidc<'_> {
        Oidc::new(&self.transport)
    }

    pub fn teams(&self) -> Teams<'_> {
        Teams::new(&self.transport)
    }

    pub fn webhooks(&self) -> Webhooks<'_> {
        Webhooks::new(&self.transport)
    }

    pub fn api_keys(&self) -> ApiKeys<'_> {
        ApiKeys::new(&self.transport)
    }

    pub fn audit_logs(&self) -> AuditLogs<'_> {
        AuditLogs::new(&self.transport)
    }
}
