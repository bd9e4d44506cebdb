/// Platform administration endpoints
///
/// Restricted to users with the platform ADMIN role.
///
/// # Endpoints
///
/// - `POST /v1/admin/onboarding/cleanup` - Delete expired, unfinished onboarding sessions
///
/// # Response
///
/// ```json
/// { "deleted_count": 4, "message": "Cleaned up 4 expired onboarding sessions" }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use strive_shared::{
    auth::{identity::require_auth, middleware::AuthContext},
    onboarding::{cleanup_expired_sessions, CleanupResult},
};

pub async fn cleanup_onboarding_sessions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<CleanupResult>> {
    let user = require_auth(&state.db, &auth).await?;

    if !user.is_platform_admin() {
        return Err(ApiError::Forbidden(
            "Platform administrator access required".to_string(),
        ));
    }

    let result = cleanup_expired_sessions(&state.db).await?;

    Ok(Json(result))
}
