//! Resource facades
//!
//! Each facade is a borrowed view over the client's transport: it builds
//! the endpoint URL, sends the request and unwraps the response envelope.

mod api_keys;
mod audit_logs;
mod auth;
mod mfa;
mod oidc;
mod passkeys;
mod permissions;
mod roles;
mod saml;
mod sessions;
mod teams;
mod users;
mod webhooks;

pub use api_keys::ApiKeys;
pub use audit_logs::AuditLogs;
pub use auth::Auth;
pub use mfa::Mfa;
pub use oidc::{AuthorizationParams, AuthorizationRequest, CodeExchange, Oidc};
pub use passkeys::Passkeys;
pub use permissions::Permissions;
pub use roles::Roles;
pub use saml::Saml;
pub use sessions::Sessions;
pub use teams::Teams;
pub use users::Users;
pub use webhooks::Webhooks;

use std::borrow::Cow;

use authplatform_transport::{Method, RequestOptions, Result, Transport};
use serde::de::DeserializeOwned;

use crate::envelope::Envelope;

/// Send a request and unwrap `{"data": T}`.
async fn fetch<T: DeserializeOwned>(
    transport: &Transport,
    method: Method,
    path: &str,
    options: RequestOptions,
) -> Result<T> {
    let url = transport.build_scoped_url(path);
    transport
        .request_json::<Envelope<T>>(method, &url, options)
        .await
        .map(|envelope| envelope.data)
}

/// Send a request whose response body is not needed.
async fn send(
    transport: &Transport,
    method: Method,
    path: &str,
    options: RequestOptions,
) -> Result<()> {
    let url = transport.build_scoped_url(path);
    transport.request(method, &url, options).await.map(|_| ())
}

/// Percent-encode an id for use as one path segment.
fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}
