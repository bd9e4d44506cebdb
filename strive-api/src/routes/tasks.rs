/// Bulk task endpoints
///
/// All endpoints require JWT authentication and at least MEMBER in the
/// caller's active organization. A request naming any task outside the
/// organization is rejected as a whole.
///
/// # Endpoints
///
/// - `POST /v1/tasks/bulk/status` - Set status
/// - `POST /v1/tasks/bulk/assign` - Reassign
/// - `POST /v1/tasks/bulk/priority` - Set priority
/// - `POST /v1/tasks/bulk/delete` - Delete
///
/// # Response
///
/// ```json
/// { "count": 3 }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use strive_shared::{
    auth::{identity::require_auth, middleware::AuthContext},
    bulk::{
        tasks::{bulk_update_tasks, TaskAction},
        BulkIds, BulkResult,
    },
    models::task::{TaskPriority, TaskStatus},
};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub ids: Vec<Uuid>,
    pub status: TaskStatus,
}

#[derive(Debug, Deserialize)]
pub struct BulkAssignRequest {
    pub ids: Vec<Uuid>,
    pub assigned_to_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct BulkPriorityRequest {
    pub ids: Vec<Uuid>,
    pub priority: TaskPriority,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

async fn run(
    state: &AppState,
    auth: &AuthContext,
    ids: Vec<Uuid>,
    action: TaskAction,
) -> ApiResult<Json<BulkResult>> {
    let user = require_auth(&state.db, auth).await?;
    let organization_id = user.require_organization()?;

    let result = bulk_update_tasks(
        &state.db,
        state.audit.as_ref(),
        user.id,
        organization_id,
        BulkIds::new(ids),
        action,
    )
    .await?;

    Ok(Json(result))
}

pub async fn bulk_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<BulkStatusRequest>,
) -> ApiResult<Json<BulkResult>> {
    run(&state, &auth, req.ids, TaskAction::UpdateStatus(req.status)).await
}

pub async fn bulk_assign(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<BulkAssignRequest>,
) -> ApiResult<Json<BulkResult>> {
    run(&state, &auth, req.ids, TaskAction::Assign(req.assigned_to_id)).await
}

pub async fn bulk_priority(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<BulkPriorityRequest>,
) -> ApiResult<Json<BulkResult>> {
    run(&state, &auth, req.ids, TaskAction::UpdatePriority(req.priority)).await
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<BulkDeleteRequest>,
) -> ApiResult<Json<BulkResult>> {
    run(&state, &auth, req.ids, TaskAction::Delete).await
}
