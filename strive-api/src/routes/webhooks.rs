/// Payment provider webhook
///
/// # Endpoint
///
/// ```text
/// POST /v1/webhooks/payments
/// Stripe-Signature: t=1700000000,v1=5257a869...
/// Content-Type: application/json
///
/// {
///   "type": "payment_intent.succeeded",
///   "data": { "object": { "id": "pi_123", "metadata": { "sessionToken": "onb_..." } } }
/// }
/// ```
///
/// The raw body is verified before it is parsed. Events for unknown sessions
/// or of unhandled types are acknowledged so the provider stops retrying.
///
/// # Errors
///
/// - `400 Bad Request`: Missing or invalid signature, malformed event
/// - `503 Service Unavailable`: No webhook secret configured

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use strive_shared::onboarding::payment::{
    handle_payment_event, verify_signature, PaymentEvent, PaymentEventOutcome, SignatureError,
    SIGNATURE_HEADER,
};

/// Webhook acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub received: bool,
}

pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookResponse>> {
    let secret = state
        .config
        .payments
        .webhook_secret
        .as_deref()
        .ok_or_else(|| {
            tracing::error!("Payment webhook received but no webhook secret is configured");
            ApiError::ServiceUnavailable("Payment webhooks are not configured".to_string())
        })?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(SignatureError::Missing)?;

    verify_signature(signature, &body, secret, chrono::Utc::now().timestamp())?;

    let event: PaymentEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid event payload: {}", e)))?;

    match handle_payment_event(&state.db, &event).await? {
        PaymentEventOutcome::Recorded(status) => {
            tracing::info!(event_type = %event.event_type, ?status, "Payment event recorded");
        }
        PaymentEventOutcome::Ignored => {
            tracing::debug!(event_type = %event.event_type, "Payment event ignored");
        }
    }

    Ok(Json(WebhookResponse { received: true }))
}
