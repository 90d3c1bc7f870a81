//! Webhook module
//!
//! Verification of inbound webhook deliveries and the event catalogue.
//!
//! Verification is stateless: the same `(payload, header, secret)` always
//! produces the same answer for a given clock reading.

mod events;
mod signature;

pub use events::WebhookEvent;
pub use signature::{
    sign_payload, signature_header, verify_signature, verify_signature_at, SignatureError,
    SignatureHeader, DEFAULT_TOLERANCE_SECS,
};
