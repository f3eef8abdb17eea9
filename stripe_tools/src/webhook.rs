//! Webhook signature verification.
//!
//! Stripe signs every webhook delivery with an HMAC-SHA256 over `"{timestamp}.{raw_body}"` and sends the result in
//! the `Stripe-Signature` header, e.g. `t=1706000000,v1=5257a869e7...`. Verification MUST run over the raw request
//! bytes. Deserializing and re-serializing the payload first will produce a different byte sequence and the
//! signature will never match.

use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    #[error("Malformed signature header. {0}")]
    MalformedHeader(String),
    #[error("The signature does not match the payload")]
    SignatureMismatch,
    #[error("The payload could not be deserialized. {0}")]
    InvalidPayload(String),
}

/// The parsed form of a `Stripe-Signature` header value.
///
/// The header carries the timestamp the provider signed and one or more `v1` signatures (more than one appears
/// while a webhook secret is being rotated). Unknown keys are ignored.
#[derive(Debug, Clone)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp = None;
        let mut signatures = Vec::new();
        for field in header.split(',') {
            let Some((key, value)) = field.trim().split_once('=') else {
                return Err(WebhookError::MalformedHeader(format!("'{field}' is not a key=value pair")));
            };
            match key {
                "t" => {
                    let ts = value
                        .parse::<i64>()
                        .map_err(|e| WebhookError::MalformedHeader(format!("invalid timestamp '{value}'. {e}")))?;
                    timestamp = Some(ts);
                },
                "v1" => {
                    let sig = hex::decode(value)
                        .map_err(|e| WebhookError::MalformedHeader(format!("invalid signature hex. {e}")))?;
                    signatures.push(sig);
                },
                // Future scheme versions and metadata keys are skipped.
                _ => {},
            }
        }
        let timestamp = timestamp.ok_or_else(|| WebhookError::MalformedHeader("missing timestamp field".into()))?;
        if signatures.is_empty() {
            return Err(WebhookError::MalformedHeader("no v1 signature present".into()));
        }
        Ok(Self { timestamp, signatures })
    }
}

/// Checks the `Stripe-Signature` header against the raw request body.
///
/// Returns the parsed header on success so callers can inspect the signed timestamp. Replayed deliveries are not
/// rejected here. A replay carries the original event id, and the booking reconciler deduplicates on event id, so
/// a replayed delivery cannot create a second booking.
pub fn verify_webhook_signature(payload: &[u8], signature: &str, secret: &str) -> Result<SignatureHeader, WebhookError> {
    let header = SignatureHeader::parse(signature)?;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| WebhookError::MalformedHeader(format!("invalid webhook secret. {e}")))?;
    mac.update(format!("{}.", header.timestamp).as_bytes());
    mac.update(payload);
    // verify_slice is constant-time. Any one matching v1 signature accepts the payload.
    let verified = header.signatures.iter().any(|sig| mac.clone().verify_slice(sig).is_ok());
    if verified {
        Ok(header)
    } else {
        Err(WebhookError::SignatureMismatch)
    }
}

/// Verifies the signature and then deserializes the payload into an event type.
pub fn construct_event<T: DeserializeOwned>(payload: &[u8], signature: &str, secret: &str) -> Result<T, WebhookError> {
    verify_webhook_signature(payload, signature, secret)?;
    serde_json::from_slice(payload).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
}

/// Produces a `Stripe-Signature` header value for the given payload. What the provider does on its side, used to
/// sign test and replay traffic.
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(format!("{timestamp}.").as_bytes());
    mac.update(payload);
    let signature = hex::encode(mac.finalize().into_bytes());
    format!("t={timestamp},v1={signature}")
}
