//! Response translation
//!
//! Turns a raw HTTP response (status, content type, body) into either the
//! decoded JSON value or an `ApiError`. The platform answers errors in
//! several shapes; precedence for JSON error bodies is:
//!
//! 1. `{"error": {"message", "code", "details"?}}`
//! 2. `{"message", "errors": {field: [messages]}}`
//! 3. `{"error": "invalid_grant", "error_description"?}` (OIDC)
//! 4. any other JSON, using a top-level `message` if present
//!
//! Non-JSON error bodies use the raw text, or the status text when empty.
//! This module is synchronous and does no I/O.

use reqwest::StatusCode;
use serde_json::{Map, Value};

use crate::error::{ApiError, ErrorKind, FieldErrors, VALIDATION_ERROR};

/// Translate a response into its JSON value (`None` for empty successes).
pub fn translate(
    status: StatusCode,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Option<Value>, ApiError> {
    let json = content_type.is_some_and(is_json_content_type);

    if status.is_success() {
        if status == StatusCode::NO_CONTENT || !json || is_blank(body) {
            return Ok(None);
        }
        return serde_json::from_slice(body).map(Some).map_err(|e| {
            ApiError::invalid_response(format!("invalid JSON in {} response: {e}", status.as_u16()))
                .with_source(e)
        });
    }

    let parsed = if json && !is_blank(body) {
        serde_json::from_slice::<Value>(body).ok()
    } else {
        None
    };

    Err(match parsed {
        Some(value) => from_json_body(status, value),
        None => from_text_body(status, body),
    })
}

/// Whether a `Content-Type` value denotes JSON (`application/json`, `*+json`).
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Reason phrase for a status, e.g. "Service Unavailable".
pub fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

fn http_code(status: StatusCode) -> String {
    format!("HTTP_{}", status.as_u16())
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn from_json_body(status: StatusCode, value: Value) -> ApiError {
    let code = status.as_u16();

    let err = match value.get("error") {
        Some(Value::Object(error)) => from_error_object(status, error),
        Some(Value::String(protocol_code)) if !is_validation_body(&value) => {
            let message = value
                .get("error_description")
                .and_then(Value::as_str)
                .unwrap_or(protocol_code.as_str());
            ApiError::new(ErrorKind::Protocol, protocol_code.as_str(), message, code)
        }
        _ if is_validation_body(&value) => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let err = ApiError::new(ErrorKind::Validation, VALIDATION_ERROR, message, code);
            match value.get("errors").and_then(field_errors) {
                Some(details) => err.with_details(details),
                None => err,
            }
        }
        _ => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| status_text(status));
            ApiError::new(ErrorKind::from_status(code), http_code(status), message, code)
        }
    };

    err.with_body(value)
}

/// `{"error": {"message": ..., "code": ..., "details": ...}}`
fn from_error_object(status: StatusCode, error: &Map<String, Value>) -> ApiError {
    let code = error
        .get("code")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| http_code(status));
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| status_text(status));
    let kind =
        ErrorKind::from_code(&code).unwrap_or_else(|| ErrorKind::from_status(status.as_u16()));

    let err = ApiError::new(kind, code, message, status.as_u16());
    match error.get("details").and_then(field_errors) {
        Some(details) => err.with_details(details),
        None => err,
    }
}

/// Shape 2 needs both a string `message` and an object `errors`.
fn is_validation_body(value: &Value) -> bool {
    value.get("message").is_some_and(Value::is_string)
        && value.get("errors").is_some_and(Value::is_object)
}

fn from_text_body(status: StatusCode, body: &[u8]) -> ApiError {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    let message = if text.is_empty() {
        status_text(status)
    } else {
        text.to_owned()
    };
    let code = status.as_u16();
    ApiError::new(ErrorKind::from_status(code), http_code(status), message, code)
}

/// Coerce a details object into field errors. Scalar values become a
/// single message; non-object details are dropped (still in `body()`).
fn field_errors(value: &Value) -> Option<FieldErrors> {
    let object = value.as_object()?;
    let details = object
        .iter()
        .map(|(field, messages)| {
            let messages = match messages {
                Value::Array(items) => items.iter().map(message_text).collect(),
                other => vec![message_text(other)],
            };
            (field.clone(), messages)
        })
        .collect();
    Some(details)
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
