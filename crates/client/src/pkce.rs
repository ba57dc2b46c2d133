//! PKCE (Proof Key for Code Exchange) helpers per RFC 7636
//!
//! The verifier stays with the caller until the code exchange; the S256
//! challenge goes into the authorization URL.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;
use sha2::{Digest, Sha256};

/// Random code verifier: 64 bytes as URL-safe base64, 86 characters
/// (RFC 7636 allows 43-128).
pub fn generate_verifier() -> String {
    random_token::<64>()
}

/// `BASE64URL(SHA256(verifier))`
pub fn compute_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Opaque CSRF `state` value for the authorization request.
pub fn generate_state() -> String {
    random_token::<32>()
}

fn random_token<const N: usize>() -> String {
    let mut bytes = [0u8; N];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
