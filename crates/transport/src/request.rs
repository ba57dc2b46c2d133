//! Request descriptors
//!
//! `RequestOptions` collects the optional parts of a call (body, query,
//! extra headers). `prepare` turns them plus a method and URL into an
//! immutable `PreparedRequest`, which the transport reuses verbatim when it
//! retries after a refresh. Authentication headers are not part of the
//! descriptor: they are attached per attempt from the current credentials.

use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use tracing::warn;

use crate::constants::API_KEY_HEADER;
use crate::error::{ApiError, ErrorKind};

/// HTTP methods the platform API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Optional body, query parameters and headers for one call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    body: Option<Result<Vec<u8>, ApiError>>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON-encode `body`. Encoding failures surface when the request is prepared.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.body = Some(serde_json::to_vec(body).map_err(|e| {
            ApiError::new(
                ErrorKind::Unknown,
                "SERIALIZATION_ERROR",
                format!("failed to encode request body: {e}"),
                0,
            )
            .with_source(e)
        }));
        self
    }

    /// Add a query parameter. A repeated key replaces the earlier value.
    pub fn query(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        let key = key.into();
        let value = value.to_string();
        match self.query.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.query.push((key, value)),
        }
        self
    }

    /// Add a query parameter only when `value` is present.
    pub fn query_opt<V: fmt::Display>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Add an extra header. Invalid names or values are skipped with a
    /// warning, as are `Authorization` and `X-API-Key`, which only ever come
    /// from the credential provider.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Build the immutable descriptor for `method url`.
    pub fn prepare(self, method: Method, url: &str) -> Result<PreparedRequest, ApiError> {
        let mut url = Url::parse(url).map_err(|e| {
            ApiError::new(
                ErrorKind::Unknown,
                "INVALID_URL",
                format!("invalid request URL {url}: {e}"),
                0,
            )
            .with_source(e)
        })?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &self.headers {
            let name = match HeaderName::from_str(name) {
                Ok(n) => n,
                Err(e) => {
                    warn!(header = %name, error = %e, "skipping invalid header name");
                    continue;
                }
            };
            if name == AUTHORIZATION || name.as_str() == API_KEY_HEADER {
                warn!(header = %name, "skipping credential header, set credentials on the client instead");
                continue;
            }
            let value = match HeaderValue::from_str(value) {
                Ok(v) => v,
                Err(e) => {
                    warn!(header = %name, error = %e, "skipping invalid header value");
                    continue;
                }
            };
            headers.insert(name, value);
        }

        let body = self.body.transpose()?;
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(PreparedRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

/// A fully built request, minus authentication.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl PreparedRequest {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}
