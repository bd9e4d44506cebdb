/// Bulk lead endpoints
///
/// Same contract as the task endpoints, minus priority.
///
/// - `POST /v1/leads/bulk/status`
/// - `POST /v1/leads/bulk/assign`
/// - `POST /v1/leads/bulk/delete`

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use strive_shared::{
    auth::{identity::require_auth, middleware::AuthContext},
    bulk::{
        leads::{bulk_update_leads, LeadAction},
        BulkIds, BulkResult,
    },
    models::lead::LeadStatus,
};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct BulkLeadStatusRequest {
    pub ids: Vec<Uuid>,
    pub status: LeadStatus,
}

#[derive(Debug, Deserialize)]
pub struct BulkLeadAssignRequest {
    pub ids: Vec<Uuid>,
    pub assigned_to_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct BulkLeadDeleteRequest {
    pub ids: Vec<Uuid>,
}

async fn run(
    state: &AppState,
    auth: &AuthContext,
    ids: Vec<Uuid>,
    action: LeadAction,
) -> ApiResult<Json<BulkResult>> {
    let user = require_auth(&state.db, auth).await?;
    let organization_id = user.require_organization()?;

    let result = bulk_update_leads(
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
    Json(req): Json<BulkLeadStatusRequest>,
) -> ApiResult<Json<BulkResult>> {
    run(&state, &auth, req.ids, LeadAction::UpdateStatus(req.status)).await
}

pub async fn bulk_assign(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<BulkLeadAssignRequest>,
) -> ApiResult<Json<BulkResult>> {
    run(&state, &auth, req.ids, LeadAction::Assign(req.assigned_to_id)).await
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<BulkLeadDeleteRequest>,
) -> ApiResult<Json<BulkResult>> {
    run(&state, &auth, req.ids, LeadAction::Delete).await
}
