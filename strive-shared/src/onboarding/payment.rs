/// Payment confirmation for paid tiers
///
/// The payment provider reports payment-intent outcomes to a webhook. The
/// request body is authenticated with an HMAC-SHA256 signature header:
///
/// ```text
/// Stripe-Signature: t=1700000000,v1=5257a869e7ecebeda32affa62cdca3fa51cad7e77a0e56ff536d0ce8e108d8bd
/// ```
///
/// where `v1` is the hex HMAC of `"{t}.{raw body}"` under the webhook
/// secret. Signatures older than [`SIGNATURE_TOLERANCE_SECS`] are refused.
///
/// # Example
///
/// ```
/// use strive_shared::onboarding::payment::{sign_payload, verify_signature};
///
/// let body = br#"{"type":"payment_intent.succeeded"}"#;
/// let header = sign_payload(body, "whsec_test", 1_700_000_000);
/// assert!(verify_signature(&header, body, "whsec_test", 1_700_000_030).is_ok());
/// ```

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sqlx::PgPool;
use tracing::{info, warn};

use super::OnboardingError;
use crate::models::onboarding_session::{OnboardingSession, PaymentStatus};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Maximum accepted age of a signature
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Error type for webhook signature verification
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Missing signature")]
    Missing,

    #[error("Malformed signature header")]
    Malformed,

    #[error("Signature timestamp outside tolerance")]
    Expired,

    #[error("Invalid signature")]
    Mismatch,
}

fn mac_for(secret: &str, timestamp: i64, body: &[u8]) -> HmacSha256 {
    // HMAC accepts keys of any length
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC key length is unrestricted"));
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    mac
}

/// Builds a signature header value for `body`
pub fn sign_payload(body: &[u8], secret: &str, timestamp: i64) -> String {
    let signature = hex::encode(mac_for(secret, timestamp, body).finalize().into_bytes());
    format!("t={},v1={}", timestamp, signature)
}

/// Verifies a signature header against the raw body at time `now`
///
/// Any of several `v1` entries may match, which allows secret rotation on
/// the provider side.
pub fn verify_signature(
    header: &str,
    body: &[u8],
    secret: &str,
    now: i64,
) -> Result<(), SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(value.parse::<i64>().map_err(|_| SignatureError::Malformed)?)
            }
            Some(("v1", value)) => signatures.push(value),
            Some(_) => {}
            None => return Err(SignatureError::Malformed),
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if signatures.is_empty() {
        return Err(SignatureError::Malformed);
    }

    if now.abs_diff(timestamp) > SIGNATURE_TOLERANCE_SECS.unsigned_abs() {
        return Err(SignatureError::Expired);
    }

    let matched = signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| mac_for(secret, timestamp, body).verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });

    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Webhook event envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: PaymentEventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEventData {
    pub object: PaymentIntent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,

    #[serde(default)]
    pub metadata: PaymentMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentMetadata {
    /// Onboarding session the payment belongs to
    #[serde(rename = "sessionToken", alias = "session_token")]
    pub session_token: Option<String>,
}

impl PaymentEvent {
    /// Payment outcome carried by this event, if it is a payment-intent event
    pub fn outcome(&self) -> Option<PaymentStatus> {
        match self.event_type.as_str() {
            "payment_intent.succeeded" => Some(PaymentStatus::Succeeded),
            "payment_intent.payment_failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// What handling a webhook event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEventOutcome {
    Recorded(PaymentStatus),
    Ignored,
}

/// Stores a payment outcome on an open session
pub async fn record_payment(
    pool: &PgPool,
    session_token: &str,
    outcome: PaymentStatus,
    payment_intent_id: &str,
) -> Result<OnboardingSession, OnboardingError> {
    let session =
        OnboardingSession::record_payment(pool, session_token, outcome, payment_intent_id)
            .await?
            .ok_or(OnboardingError::SessionNotFound)?;

    info!(
        session_id = %session.id,
        payment_intent_id,
        reported = ?outcome,
        payment_status = ?session.payment_status,
        "Payment outcome recorded"
    );

    Ok(session)
}

/// Applies a verified webhook event
///
/// Events of other types, or without a session token, are acknowledged and
/// ignored. An unknown session is logged and ignored so the provider stops
/// redelivering.
pub async fn handle_payment_event(
    pool: &PgPool,
    event: &PaymentEvent,
) -> Result<PaymentEventOutcome, OnboardingError> {
    let Some(outcome) = event.outcome() else {
        info!(event_type = %event.event_type, "Unhandled payment event type");
        return Ok(PaymentEventOutcome::Ignored);
    };

    let intent = &event.data.object;
    let Some(session_token) = intent.metadata.session_token.as_deref() else {
        info!(payment_intent_id = %intent.id, "Payment event without onboarding session");
        return Ok(PaymentEventOutcome::Ignored);
    };

    match record_payment(pool, session_token, outcome, &intent.id).await {
        Ok(session) => Ok(PaymentEventOutcome::Recorded(session.payment_status)),
        Err(OnboardingError::SessionNotFound) => {
            warn!(payment_intent_id = %intent.id, "Payment event for unknown or completed session");
            Ok(PaymentEventOutcome::Ignored)
        }
        Err(e) => Err(e),
    }
}
