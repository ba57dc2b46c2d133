//! Platform wire constants

/// Scoped path of the token refresh endpoint
pub const REFRESH_PATH: &str = "users/token/refresh";

/// Header carrying the server-to-server API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Prefix of the `Authorization` header value for bearer tokens
pub const BEARER_PREFIX: &str = "Bearer ";
