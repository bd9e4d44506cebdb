/// Organization member endpoints
///
/// # Endpoints
///
/// - `GET /v1/members` - List members of the active organization (any member)
/// - `DELETE /v1/members/:user_id` - Remove a member (ADMIN+)
///
/// The organization owner cannot be removed.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use strive_shared::{
    auth::{
        authorization::{require_membership, require_permission, ResourcePermission},
        identity::require_auth,
        middleware::AuthContext,
    },
    models::membership::{MemberSummary, Membership, OrgRole},
};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ListMembersResponse {
    pub members: Vec<MemberSummary>,
}

#[derive(Debug, Serialize)]
pub struct RemoveMemberResponse {
    pub removed: bool,
}

pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListMembersResponse>> {
    let user = require_auth(&state.db, &auth).await?;
    let organization_id = user.require_organization()?;
    require_membership(&state.db, organization_id, user.id).await?;

    let members = Membership::list_by_organization(&state.db, organization_id).await?;

    Ok(Json(ListMembersResponse { members }))
}

/// Remove a member
///
/// # Errors
///
/// - `403 Forbidden`: Caller is below ADMIN, or the target is the OWNER
/// - `404 Not Found`: Target is not a member of the organization
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(member_id): Path<Uuid>,
) -> ApiResult<Json<RemoveMemberResponse>> {
    let user = require_auth(&state.db, &auth).await?;
    let organization_id = user.require_organization()?;
    require_permission(&state.db, organization_id, user.id, ResourcePermission::Manage).await?;

    let target = Membership::find(&state.db, organization_id, member_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    if target.role == OrgRole::Owner {
        return Err(ApiError::Forbidden(
            "Cannot remove the organization owner".to_string(),
        ));
    }

    let removed = Membership::delete(&state.db, organization_id, member_id).await?;

    tracing::info!(
        organization_id = %organization_id,
        member_id = %member_id,
        removed_by = %user.id,
        "Organization member removed"
    );

    Ok(Json(RemoveMemberResponse { removed }))
}
