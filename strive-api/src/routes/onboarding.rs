/// Onboarding endpoints
///
/// All endpoints require JWT authentication. A session is only visible to
/// the user who started it; anyone else gets `404 Session not found`.
///
/// # Endpoints
///
/// - `POST /v1/onboarding/sessions` - Start a session
/// - `GET /v1/onboarding/sessions/:token` - Read a session
/// - `PUT /v1/onboarding/sessions/:token/steps/:step` - Save step 1 or 2
/// - `POST /v1/onboarding/sessions/:token/complete` - Provision the organization

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value as JsonValue;
use strive_shared::{
    auth::{identity::require_auth, middleware::AuthContext},
    models::onboarding_session::OnboardingSession,
    onboarding::{self, CompletionResult, OnboardingError, StepData},
};

/// Loads a session and checks it belongs to the caller
async fn owned_session(
    state: &AppState,
    auth: &AuthContext,
    token: &str,
) -> Result<OnboardingSession, OnboardingError> {
    let session = onboarding::get_session(&state.db, token).await?;

    if session.user_id != auth.user_id {
        return Err(OnboardingError::SessionNotFound);
    }

    Ok(session)
}

/// Start onboarding
///
/// # Endpoint
///
/// ```text
/// POST /v1/onboarding/sessions
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Response
///
/// `201 Created` with the new session, including its `session_token`.
pub async fn create_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<(StatusCode, Json<OnboardingSession>)> {
    let user = require_auth(&state.db, &auth).await?;

    let session =
        onboarding::create_session(&state.db, user.id, state.config.onboarding.session_ttl())
            .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(token): Path<String>,
) -> ApiResult<Json<OnboardingSession>> {
    Ok(Json(owned_session(&state, &auth, &token).await?))
}

/// Save step data
///
/// # Endpoint
///
/// ```text
/// PUT /v1/onboarding/sessions/:token/steps/1
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "org_name": "Acme Realty",
///   "org_website": "https://acme.example",
///   "org_description": "Residential brokerage"
/// }
/// ```
///
/// ```text
/// PUT /v1/onboarding/sessions/:token/steps/2
///
/// { "selected_tier": "GROWTH", "billing_cycle": "YEARLY" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Unknown step, malformed body, expired session
/// - `404 Not Found`: Session not found
/// - `409 Conflict`: Session already completed
/// - `422 Unprocessable Entity`: Field validation failed
pub async fn update_step(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((token, step)): Path<(String, i32)>,
    Json(body): Json<JsonValue>,
) -> ApiResult<Json<OnboardingSession>> {
    owned_session(&state, &auth, &token).await?;

    let data = StepData::from_json(step, body)?;
    let session = onboarding::update_step(&state.db, &token, data).await?;

    Ok(Json(session))
}

/// Complete onboarding
///
/// # Response
///
/// ```json
/// {
///   "organization": { "id": "uuid", "name": "Acme Realty", "slug": "acme-realty", ... },
///   "subscription": { "id": "uuid", "tier": "FREE", "status": "ACTIVE", ... }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Organization name or tier missing, session expired
/// - `402 Payment Required`: Paid tier without a confirmed payment
/// - `404 Not Found`: Session not found
/// - `409 Conflict`: Session already completed
pub async fn complete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(token): Path<String>,
) -> ApiResult<(StatusCode, Json<CompletionResult>)> {
    owned_session(&state, &auth, &token).await?;

    let result = onboarding::complete_onboarding(&state.db, &token).await?;

    Ok((StatusCode::CREATED, Json(result)))
}
