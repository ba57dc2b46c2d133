//! Typed client for the auth platform API
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use authplatform_client::{Client, ClientConfig};
//!
//! let client = Client::new(ClientConfig::new("https://auth.example.com", "app_123"))?;
//! let session = client.auth().login("ada@example.com", "hunter2").await?;
//! let me = client.auth().me().await?;
//! # let _ = (session, me);
//! # Ok(())
//! # }
//! ```
//!
//! Every operation returns `Result<T, ApiError>`. Expired access tokens are
//! refreshed once and the request retried transparently.

mod client;
pub mod envelope;
pub mod models;
pub mod pkce;
pub mod resources;
pub mod webhook;

#[cfg(test)]
mod test_support;

pub use authplatform_transport::{ApiError, ErrorKind, FieldErrors, Result};
pub use client::Client;
pub use common::ClientConfig;
pub use envelope::{Envelope, ListParams, PageMeta, Paginated};
pub use provider::RefreshOutcome;
