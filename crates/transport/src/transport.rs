//! Request execution with timeout and coordinated 401 recovery
//!
//! One logical call runs build → dispatch → translate. When the result is a
//! 401 and the credential provider holds a refresh token, the call joins (or
//! starts) the single in-flight refresh, then reruns dispatch and translate
//! exactly once with the refreshed credentials. If the refresh fails, the
//! original 401 is returned with the refresh failure as its source.
//!
//! Nothing else is retried.

use std::sync::Arc;
use std::time::Duration;

use common::ClientConfig;
use futures_util::future::{BoxFuture, FutureExt};
use provider::{CredentialProvider, RefreshOutcome};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::constants::{API_KEY_HEADER, BEARER_PREFIX, REFRESH_PATH};
use crate::error::{ApiError, ErrorKind, Result};
use crate::refresh::{RefreshCoordinator, RefreshRequest, parse_refresh_response};
use crate::request::{Method, PreparedRequest, RequestOptions};
use crate::translate::translate;
use crate::url::Endpoints;

/// Which credential, if any, goes on an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Auth {
    Bearer(String),
    ApiKey(String),
    None,
}

impl Auth {
    /// Bearer token wins over API key.
    fn select(token: Option<String>, api_key: Option<String>) -> Self {
        match (token, api_key) {
            (Some(token), _) => Auth::Bearer(token),
            (None, Some(key)) => Auth::ApiKey(key),
            (None, None) => Auth::None,
        }
    }

    fn bearer(&self) -> Option<&str> {
        match self {
            Auth::Bearer(token) => Some(token),
            _ => None,
        }
    }

    fn header(&self) -> Result<Option<(HeaderName, HeaderValue)>> {
        let (name, value) = match self {
            Auth::Bearer(token) => (AUTHORIZATION, format!("{BEARER_PREFIX}{token}")),
            Auth::ApiKey(key) => (HeaderName::from_static(API_KEY_HEADER), key.clone()),
            Auth::None => return Ok(None),
        };
        let mut value = HeaderValue::from_str(&value).map_err(|e| {
            ApiError::new(
                ErrorKind::Authentication,
                "INVALID_CREDENTIAL",
                "credential contains characters not allowed in a header",
                0,
            )
            .with_source(e)
        })?;
        value.set_sensitive(true);
        Ok(Some((name, value)))
    }
}

/// HTTP transport shared by every resource facade.
pub struct Transport {
    http: reqwest::Client,
    endpoints: Endpoints,
    timeout: Duration,
    credentials: Arc<dyn CredentialProvider>,
    refresh: RefreshCoordinator,
}

impl Transport {
    pub fn new(config: &ClientConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self::with_http_client(reqwest::Client::new(), config, credentials)
    }

    /// Use a preconfigured reqwest client (proxies, TLS roots, user agent).
    pub fn with_http_client(
        http: reqwest::Client,
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            http,
            endpoints: Endpoints::new(&config.base_url, &config.application_id),
            timeout: config.timeout(),
            credentials,
            refresh: RefreshCoordinator::new(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    /// Number of refresh calls started so far.
    pub fn refreshes_started(&self) -> u64 {
        self.refresh.started()
    }

    /// `<base>/api/v1/applications/<app_id>/<path>`
    pub fn build_scoped_url(&self, path: &str) -> String {
        self.endpoints.scoped(path)
    }

    /// `<base>/<path>`
    pub fn build_unscoped_url(&self, path: &str) -> String {
        self.endpoints.unscoped(path)
    }

    /// Execute one logical request and return the decoded JSON body
    /// (`None` for 204 and non-JSON successes).
    #[instrument(skip_all, fields(method = %method, url = %url))]
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<Option<Value>> {
        let prepared = options.prepare(method, url)?;

        let auth = self.current_auth();
        let err = match self.attempt(&prepared, &auth).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_unauthorized() {
            return Err(err);
        }
        let Some(refresh_token) = self.credentials.refresh_token() else {
            debug!("401 without refresh token, not recovering");
            return Err(err);
        };

        // Someone refreshed while this request was in flight: the 401 was
        // for the old token, so retry with the new one instead of refreshing again.
        let current = self.current_auth();
        if current.bearer().is_some() && current.bearer() != auth.bearer() {
            debug!("credentials changed since dispatch, retrying");
            return self.attempt(&prepared, &current).await;
        }

        match self.refresh.run(|| self.refresh_future(refresh_token)).await {
            Ok(_) => {
                debug!("retrying after token refresh");
                let auth = self.current_auth();
                self.attempt(&prepared, &auth).await
            }
            Err(refresh_err) => {
                debug!(
                    kind = refresh_err.kind().as_str(),
                    code = refresh_err.code(),
                    "token refresh failed, returning original error"
                );
                Err(err.with_source(refresh_err))
            }
        }
    }

    /// Execute a request and decode the body into `T`.
    ///
    /// An empty body decodes from JSON `null`, so `()` and `Option<_>` work
    /// for endpoints answering 204.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let value = self.request(method, url, options).await?;
        serde_json::from_value(value.unwrap_or(Value::Null)).map_err(|e| {
            ApiError::invalid_response(format!("unexpected response shape from {url}: {e}"))
                .with_source(e)
        })
    }

    /// Refresh credentials now, sharing any refresh already in flight.
    pub async fn refresh_now(&self) -> Result<RefreshOutcome> {
        let refresh_token = self.credentials.refresh_token().ok_or_else(|| {
            ApiError::new(
                ErrorKind::Authentication,
                "NO_REFRESH_TOKEN",
                "no refresh token available",
                0,
            )
        })?;
        self.refresh.run(|| self.refresh_future(refresh_token)).await
    }

    fn current_auth(&self) -> Auth {
        Auth::select(self.credentials.token(), self.credentials.api_key())
    }

    async fn attempt(&self, prepared: &PreparedRequest, auth: &Auth) -> Result<Option<Value>> {
        dispatch(&self.http, prepared, auth, self.timeout).await
    }

    /// The whole refresh: network call, then the provider update hook.
    /// Runs once per refresh no matter how many requests await it.
    fn refresh_future(&self, refresh_token: String) -> BoxFuture<'static, Result<RefreshOutcome>> {
        let http = self.http.clone();
        let url = self.endpoints.scoped(REFRESH_PATH);
        let timeout = self.timeout;
        let credentials = self.credentials.clone();
        // The expired bearer is useless here; only the API key rides along.
        let auth = match credentials.api_key() {
            Some(key) => Auth::ApiKey(key),
            None => Auth::None,
        };

        async move {
            let prepared = RequestOptions::new()
                .json(&RefreshRequest {
                    refresh_token: &refresh_token,
                })
                .prepare(Method::Post, &url)?;
            let value = dispatch(&http, &prepared, &auth, timeout).await?;
            let outcome = parse_refresh_response(value)?;
            credentials.on_refresh_success(&outcome);
            info!(expires_in = outcome.expires_in, "token refresh succeeded");
            Ok::<_, ApiError>(outcome)
        }
        .boxed()
    }
}

/// Send one attempt under `timeout` and translate the response.
async fn dispatch(
    http: &reqwest::Client,
    prepared: &PreparedRequest,
    auth: &Auth,
    timeout: Duration,
) -> Result<Option<Value>> {
    let mut builder = http
        .request(prepared.method().into(), prepared.url().clone())
        .headers(prepared.headers().clone());
    if let Some((name, value)) = auth.header()? {
        builder = builder.header(name, value);
    }
    if let Some(body) = prepared.body() {
        builder = builder.body(body.to_vec());
    }

    let send = async {
        let response = builder.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?;
        Ok::<_, reqwest::Error>((status, content_type, body))
    };

    // Dropping `send` on expiry aborts the in-flight call.
    match tokio::time::timeout(timeout, send).await {
        Err(_elapsed) => Err(ApiError::timeout(timeout)),
        Ok(Err(e)) if e.is_timeout() => Err(ApiError::timeout(timeout).with_source(e)),
        Ok(Err(e)) => Err(ApiError::network(e.to_string()).with_source(e)),
        Ok(Ok((status, content_type, body))) => {
            debug!(status = status.as_u16(), "response received");
            translate(status, content_type.as_deref(), &body)
        }
    }
}
