//! Advisory decoding of session token claims
//!
//! The backend issues compact JWTs. The client decodes the payload only to
//! learn the expiry instant for UX purposes (auto-logout, discarding stale
//! stored tokens). The signature is never checked here; authorization is
//! enforced by the server alone.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Claims the client cares about
#[derive(Debug, Deserialize)]
struct TokenClaims {
    /// Expiration time, seconds since the epoch
    exp: Option<i64>,
}

/// Decode the payload segment of a compact token
///
/// Returns None for anything that is not a well-formed three-part token
/// with a base64url JSON payload.
fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.split('.');
    let _header = parts.next()?;
    let payload = parts.next()?;

    let raw = URL_SAFE_NO_PAD.decode(payload.as_bytes()).ok()?;
    serde_json::from_slice(&raw).ok()
}

/// Extract the expiry instant from a token, if it carries one
pub fn decode_expiry(token: &str) -> Option<DateTime<Utc>> {
    let claims = decode_claims(token)?;
    let exp = claims.exp?;
    DateTime::<Utc>::from_timestamp(exp, 0)
}

/// Whether a token's embedded expiry lies in the past
///
/// Tokens without a readable expiry are treated as not expired; the server
/// remains the authority either way.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    match decode_expiry(token) {
        Some(expires_at) => expires_at <= now,
        None => false,
    }
}

#[cfg(test)]
pub(crate) fn encode_unsigned(exp: Option<i64>) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = match exp {
        Some(exp) => format!(r#"{{"sub":"42","exp":{exp}}}"#),
        None => r#"{"sub":"42"}"#.to_string(),
    };
    let payload = URL_SAFE_NO_PAD.encode(payload.as_bytes());
    format!("{header}.{payload}.signature")
}
