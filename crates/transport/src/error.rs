//! Uniform error type for every request-shaped operation
//!
//! `ApiError` is the only failure callers see: HTTP error bodies, timeouts
//! and network failures are all converted into it. It is built once and
//! never mutated after it leaves the transport.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Field name to human-readable messages, in server order.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Result alias for transport operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Code used for client-side timeouts.
pub const REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";
/// Code used for connection-level failures.
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
/// Code used for `{message, errors}` validation bodies.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// Code used when a success body cannot be decoded.
pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";

/// Classification of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    NotFound,
    Conflict,
    RateLimited,
    Timeout,
    Network,
    Server,
    /// OIDC-style `{"error": "...", "error_description": "..."}` bodies
    Protocol,
    Unknown,
}

impl ErrorKind {
    /// Kind implied by an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ErrorKind::Validation,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Authorization,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            429 => ErrorKind::RateLimited,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        }
    }

    /// Kind implied by a platform error code family, e.g. `AUTH_*`.
    ///
    /// Returns `None` for codes outside the known families so the caller can
    /// fall back to the status.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.to_ascii_uppercase();
        if code.starts_with("AUTHZ_")
            || code.starts_with("PERMISSION_")
            || code.starts_with("FORBIDDEN")
        {
            Some(ErrorKind::Authorization)
        } else if code.starts_with("AUTH_")
            || code.starts_with("TOKEN_")
            || code == "UNAUTHENTICATED"
            || code == "UNAUTHORIZED"
        {
            Some(ErrorKind::Authentication)
        } else if code.starts_with("VALIDATION") {
            Some(ErrorKind::Validation)
        } else if code.ends_with("NOT_FOUND") {
            Some(ErrorKind::NotFound)
        } else if code.contains("CONFLICT") || code.ends_with("ALREADY_EXISTS") {
            Some(ErrorKind::Conflict)
        } else if code.starts_with("RATE_LIMIT") || code.starts_with("TOO_MANY") {
            Some(ErrorKind::RateLimited)
        } else {
            None
        }
    }

    /// Label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Authorization => "authorization",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Network => "network",
            ErrorKind::Server => "server",
            ErrorKind::Protocol => "protocol",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Whether a caller-side retry can plausibly succeed.
    /// The transport itself never retries on these.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimited | ErrorKind::Timeout | ErrorKind::Network | ErrorKind::Server
        )
    }
}

/// Structured failure returned by every request.
///
/// `status` is the HTTP status, or 0 when no response was received (timeout,
/// network) or the response could not be decoded. The `source()` chain keeps
/// the underlying cause: the reqwest error for network failures, or the
/// refresh failure hidden behind a re-raised 401.
#[derive(Debug, Clone)]
pub struct ApiError {
    kind: ErrorKind,
    code: String,
    message: String,
    status: u16,
    details: Option<FieldErrors>,
    body: Option<serde_json::Value>,
    source: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// `source()` yields the error inside the `Arc`, not the `Arc` itself,
// so `find_in` can downcast it.
impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl ApiError {
    pub fn new(
        kind: ErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
        status: u16,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            status,
            details: None,
            body: None,
            source: None,
        }
    }

    /// Client-side timeout after `timeout` elapsed without a response.
    pub fn timeout(timeout: Duration) -> Self {
        Self::new(
            ErrorKind::Timeout,
            REQUEST_TIMEOUT,
            format!("Request timed out after {}ms", timeout.as_millis()),
            0,
        )
    }

    /// Connection-level failure. An empty message becomes a generic one.
    pub fn network(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "Unknown network error".to_string()
        } else {
            message
        };
        Self::new(ErrorKind::Network, NETWORK_ERROR, message, 0)
    }

    /// A success response whose body could not be decoded.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, INVALID_RESPONSE, message, 0)
    }

    pub fn with_details(mut self, details: FieldErrors) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Machine-readable code, e.g. `AUTH_INVALID_CREDENTIALS` or `HTTP_503`.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn details(&self) -> Option<&FieldErrors> {
        self.details.as_ref()
    }

    /// Messages for one field of a validation failure.
    pub fn field_errors(&self, field: &str) -> Option<&[String]> {
        self.details
            .as_ref()
            .and_then(|d| d.get(field))
            .map(Vec::as_slice)
    }

    /// Raw JSON error body, when the server sent one.
    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Whether this error came from an authentication failure (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Find the first `ApiError` in an error's source chain.
    ///
    /// This is how callers holding an arbitrary `dyn Error` (for example
    /// inside `anyhow` or a boxed error) tell a structured platform error
    /// apart from any other failure.
    pub fn find_in<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a ApiError> {
        let mut current = Some(err);
        while let Some(e) = current {
            if let Some(api) = e.downcast_ref::<ApiError>() {
                return Some(api);
            }
            current = e.source();
        }
        None
    }

    /// Whether `err` or any of its sources is an `ApiError`.
    pub fn is_api_error(err: &(dyn std::error::Error + 'static)) -> bool {
        Self::find_in(err).is_some()
    }
}
