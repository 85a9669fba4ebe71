//! Webhook signing
//!
//! The `Stripe-Signature` header has the shape `t=<unix>,v1=<hex>[,v1=<hex>]`.
//! Each `v1` is HMAC-SHA256 over `"{t}.{payload}"` keyed with the endpoint
//! secret.

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;

use tours_core::services::CompletedCheckout;

type HmacSha256 = Hmac<Sha256>;

const COMPLETED_EVENT: &str = "checkout.session.completed";

fn compute(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| format!("invalid webhook secret: {}", e))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Builds a header value for `payload`, as the processor would send it
pub fn signature_header(payload: &[u8], secret: &str, timestamp: i64) -> Result<String, String> {
    Ok(format!("t={},v1={}", timestamp, compute(secret, timestamp, payload)?))
}

/// Checks the header against the payload and rejects stale timestamps
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_seconds: i64,
    now: i64,
) -> Result<(), String> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| "Unable to extract timestamp and signatures from header".to_string())?;
    if signatures.is_empty() {
        return Err("No signatures found with expected scheme".to_string());
    }

    let expected = compute(secret, timestamp, payload)?;
    let matched = signatures
        .iter()
        .any(|candidate| constant_time_eq(candidate.as_bytes(), expected.as_bytes()));
    if !matched {
        return Err("No signatures found matching the expected signature for payload".to_string());
    }

    if tolerance_seconds > 0 && now.abs_diff(timestamp) > tolerance_seconds.unsigned_abs() {
        return Err("Timestamp outside the tolerance zone".to_string());
    }
    Ok(())
}

#[derive(Deserialize)]
struct Event {
    #[serde(rename = "type")]
    kind: String,
    data: EventData,
}

#[derive(Deserialize)]
struct EventData {
    object: Value,
}

/// Extracts the session of a `checkout.session.completed` event.
///
/// Other event types yield `Ok(None)`.
pub fn parse_checkout_event(payload: &[u8]) -> Result<Option<CompletedCheckout>, String> {
    let event: Event =
        serde_json::from_slice(payload).map_err(|e| format!("invalid event payload: {}", e))?;
    if event.kind != COMPLETED_EVENT {
        tracing::debug!(event = %event.kind, "ignoring webhook event");
        return Ok(None);
    }
    serde_json::from_value(event.data.object)
        .map(Some)
        .map_err(|e| format!("invalid checkout session: {}", e))
}
