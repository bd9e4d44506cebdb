/// Transaction loop endpoints
///
/// All endpoints require JWT authentication and act on the caller's active
/// organization. Loops from other organizations are reported as missing.
///
/// # Endpoints
///
/// - `GET /v1/loops` - List loops (VIEW_LOOPS)
/// - `POST /v1/loops` - Create loop (CREATE_LOOPS)
/// - `PATCH /v1/loops/:id` - Update loop (creator, org OWNER/ADMIN, platform ADMIN)
/// - `DELETE /v1/loops/:id` - Delete loop (DELETE_LOOPS)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use strive_shared::{
    auth::{
        identity::{require_auth, AuthUser},
        middleware::AuthContext,
        rbac::{can_modify_loop, has_permission, Permission},
    },
    models::transaction_loop::{
        CreateTransactionLoop, LoopStatus, TransactionLoop, UpdateTransactionLoop,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create loop request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLoopRequest {
    #[validate(length(min = 1, max = 512, message = "Property address must be 1-512 characters"))]
    pub property_address: String,
}

/// Update loop request; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLoopRequest {
    #[validate(length(min = 1, max = 512, message = "Property address must be 1-512 characters"))]
    pub property_address: Option<String>,

    pub status: Option<LoopStatus>,
}

#[derive(Debug, Serialize)]
pub struct ListLoopsResponse {
    pub loops: Vec<TransactionLoop>,
}

#[derive(Debug, Serialize)]
pub struct DeleteLoopResponse {
    pub deleted: bool,
}

fn ensure(user: &AuthUser, permission: Permission) -> ApiResult<()> {
    if !has_permission(user, permission) {
        tracing::debug!(user_id = %user.id, ?permission, "Permission denied");
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this action".to_string(),
        ));
    }

    Ok(())
}

fn loop_not_found() -> ApiError {
    ApiError::NotFound("Loop not found".to_string())
}

pub async fn list_loops(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListLoopsResponse>> {
    let user = require_auth(&state.db, &auth).await?;
    let organization_id = user.require_organization()?;
    ensure(&user, Permission::ViewLoops)?;

    let loops = TransactionLoop::list_by_organization(&state.db, organization_id).await?;

    Ok(Json(ListLoopsResponse { loops }))
}

/// Create a loop
///
/// # Endpoint
///
/// ```text
/// POST /v1/loops
/// Authorization: Bearer <jwt_token>
///
/// { "property_address": "12 Harbor Lane" }
/// ```
///
/// # Response
///
/// `201 Created` with the loop in status `DRAFT`.
pub async fn create_loop(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateLoopRequest>,
) -> ApiResult<(StatusCode, Json<TransactionLoop>)> {
    req.validate()?;

    let user = require_auth(&state.db, &auth).await?;
    let organization_id = user.require_organization()?;
    ensure(&user, Permission::CreateLoops)?;

    let transaction_loop = TransactionLoop::create(
        &state.db,
        CreateTransactionLoop {
            organization_id,
            property_address: req.property_address,
            created_by: user.id,
        },
    )
    .await?;

    tracing::info!(
        loop_id = %transaction_loop.id,
        organization_id = %organization_id,
        "Transaction loop created"
    );

    Ok((StatusCode::CREATED, Json(transaction_loop)))
}

/// Update a loop
///
/// The creator may always edit their own loop, whatever their org role.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is neither the creator nor an org OWNER/ADMIN
/// - `404 Not Found`: Loop not found in the active organization
pub async fn update_loop(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateLoopRequest>,
) -> ApiResult<Json<TransactionLoop>> {
    req.validate()?;

    let user = require_auth(&state.db, &auth).await?;
    let organization_id = user.require_organization()?;

    let existing = TransactionLoop::find(&state.db, organization_id, id)
        .await?
        .ok_or_else(loop_not_found)?;

    if !can_modify_loop(&user, &existing) {
        return Err(ApiError::Forbidden(
            "You do not have permission to modify this loop".to_string(),
        ));
    }

    let updated = TransactionLoop::update(
        &state.db,
        organization_id,
        id,
        UpdateTransactionLoop {
            property_address: req.property_address,
            status: req.status,
        },
    )
    .await?
    .ok_or_else(loop_not_found)?;

    Ok(Json(updated))
}

pub async fn delete_loop(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteLoopResponse>> {
    let user = require_auth(&state.db, &auth).await?;
    let organization_id = user.require_organization()?;
    ensure(&user, Permission::DeleteLoops)?;

    if !TransactionLoop::delete(&state.db, organization_id, id).await? {
        return Err(loop_not_found());
    }

    tracing::info!(loop_id = %id, organization_id = %organization_id, "Transaction loop deleted");

    Ok(Json(DeleteLoopResponse { deleted: true }))
}
