//! Shared types for the auth platform client workspace
//!
//! Holds the pieces every other crate leans on: the `Secret` wrapper that
//! keeps credentials out of logs, and the `ClientConfig` loaded from TOML.

mod config;
mod error;
mod secret;

pub use config::{API_KEY_ENV, CONFIG_PATH_ENV, ClientConfig, DEFAULT_TIMEOUT_MS};
pub use error::{Error, Result};
pub use secret::Secret;
