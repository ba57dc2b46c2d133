//! Webhook signature verification
//!
//! The platform signs each delivery body with HMAC-SHA256 using the
//! webhook's secret and sends the hex digest, optionally prefixed with
//! `sha256=`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Check `signature` against the HMAC-SHA256 of `payload` under `secret`.
///
/// Malformed signatures (bad hex, wrong length) are rejected rather than
/// reported as errors. The digest comparison is constant-time.
pub fn verify_signature(payload: &[u8], signature: &str, secret: &str) -> bool {
    let signature = signature.trim();
    let hex_digest = signature.strip_prefix("sha256=").unwrap_or(signature);
    let Ok(expected) = hex::decode(hex_digest) else {
        debug!("webhook signature is not valid hex");
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

/// Hex HMAC-SHA256 signature for `payload`, in the platform's header format.
pub fn sign(payload: &[u8], secret: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        // HMAC accepts keys of any length
        Err(_) => return String::new(),
    };
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
