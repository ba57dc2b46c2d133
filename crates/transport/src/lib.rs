//! HTTP transport for the auth platform API
//!
//! Builds requests, attaches credentials from a `CredentialProvider`,
//! enforces the configured timeout, translates responses into JSON values or
//! a structured `ApiError`, and recovers from expired access tokens with a
//! single coordinated refresh.

pub mod constants;
pub mod error;
pub mod refresh;
pub mod request;
pub mod translate;
pub mod url;

mod transport;

pub use error::{ApiError, ErrorKind, FieldErrors, Result};
pub use refresh::RefreshCoordinator;
pub use request::{Method, PreparedRequest, RequestOptions};
pub use transport::Transport;
pub use translate::translate;
pub use url::Endpoints;
