//! HMAC-SHA256 webhook signatures.
//!
//! The platform signs each delivery and sends the result in a header of the
//! form `t=<unix-seconds>,v1=<hex-hmac-sha256>`:
//! - The signature is computed over: `{timestamp}.{payload}`
//! - The key is the webhook secret, used as raw bytes
//! - The digest is lowercase hex
//!
//! Binding the timestamp into the signed content means a captured signature
//! stops verifying once it leaves the tolerance window.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Default freshness window in seconds
pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

/// Reasons a signature header cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("malformed signature header element: {0:?}")]
    Malformed(String),
    #[error("signature header has no `t` timestamp")]
    MissingTimestamp,
    #[error("signature timestamp is not an integer: {0:?}")]
    InvalidTimestamp(String),
    #[error("signature header has no `v1` signature")]
    MissingSignature,
}

/// Parsed `t=...,v1=...` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix seconds at which the payload was signed
    pub timestamp: i64,
    /// Hex-encoded HMAC-SHA256
    pub signature: String,
}

impl SignatureHeader {
    /// Parse a header value. Field order does not matter and unknown keys
    /// are ignored; if a key repeats, its last value wins.
    pub fn parse(header: &str) -> Result<Self, SignatureError> {
        let mut timestamp = None;
        let mut signature = None;

        for element in header.split(',') {
            let (key, value) = element
                .split_once('=')
                .ok_or_else(|| SignatureError::Malformed(element.to_string()))?;

            match key {
                "t" => timestamp = Some(value),
                "v1" => signature = Some(value),
                _ => {}
            }
        }

        let raw_timestamp = timestamp.ok_or(SignatureError::MissingTimestamp)?;
        let timestamp = raw_timestamp
            .parse::<i64>()
            .map_err(|_| SignatureError::InvalidTimestamp(raw_timestamp.to_string()))?;
        let signature = signature.ok_or(SignatureError::MissingSignature)?;

        Ok(Self {
            timestamp,
            signature: signature.to_string(),
        })
    }
}

impl std::fmt::Display for SignatureHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t={},v1={}", self.timestamp, self.signature)
    }
}

/// Compute the lowercase hex HMAC-SHA256 of `{timestamp}.{payload}`
pub fn sign_payload(payload: impl AsRef<[u8]>, secret: &str, timestamp: i64) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_ref());
    hex::encode(mac.finalize().into_bytes())
}

/// Build a complete signature header for `payload`
pub fn signature_header(payload: impl AsRef<[u8]>, secret: &str, timestamp: i64) -> String {
    SignatureHeader {
        timestamp,
        signature: sign_payload(payload, secret, timestamp),
    }
    .to_string()
}

/// Verify a webhook signature against the current wall clock.
///
/// Returns `false` for any malformed header, stale or future timestamp
/// outside `tolerance_secs`, or signature mismatch. Never panics on input.
pub fn verify_signature(
    payload: impl AsRef<[u8]>,
    header: &str,
    secret: &str,
    tolerance_secs: u64,
) -> bool {
    verify_signature_at(payload, header, secret, tolerance_secs, Utc::now().timestamp())
}

/// Verify a webhook signature as of `now` (unix seconds).
pub fn verify_signature_at(
    payload: impl AsRef<[u8]>,
    header: &str,
    secret: &str,
    tolerance_secs: u64,
    now: i64,
) -> bool {
    let Ok(parsed) = SignatureHeader::parse(header) else {
        return false;
    };

    if now.abs_diff(parsed.timestamp) > tolerance_secs {
        return false;
    }

    let expected = sign_payload(payload, secret, parsed.timestamp);
    constant_time_eq(parsed.signature.as_bytes(), expected.as_bytes())
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
