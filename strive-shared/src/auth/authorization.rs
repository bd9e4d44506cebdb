/// Membership-level authorization checks
///
/// These helpers answer "does this user hold at least role X in
/// organization Y" against the database. Loop permissions go through the
/// pure resolver in [`super::rbac`] instead.
///
/// # Example
///
/// ```no_run
/// use strive_shared::auth::authorization::{require_permission, ResourcePermission};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, organization_id: Uuid, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// require_permission(&pool, organization_id, user_id, ResourcePermission::Write).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::membership::{Membership, OrgRole};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// No authenticated user behind the request
    #[error("Unauthorized")]
    Unauthenticated,

    #[error("No active organization")]
    NoActiveOrganization,

    #[error("Not a member of organization {0}")]
    NotMember(Uuid),

    #[error("Insufficient permissions: requires {required:?}, has {actual:?}")]
    InsufficientRole { required: OrgRole, actual: OrgRole },

    #[error("Not authorized to access this resource")]
    NotAuthorized,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Coarse permission levels for tenant records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourcePermission {
    /// Viewer+
    Read,

    /// Member+
    Write,

    /// Admin+
    Manage,

    /// Owner only
    Own,
}

impl ResourcePermission {
    pub fn min_role(&self) -> OrgRole {
        match self {
            ResourcePermission::Read => OrgRole::Viewer,
            ResourcePermission::Write => OrgRole::Member,
            ResourcePermission::Manage => OrgRole::Admin,
            ResourcePermission::Own => OrgRole::Owner,
        }
    }
}

/// Fails with `NotMember` unless the user belongs to the organization
pub async fn require_membership(
    pool: &PgPool,
    organization_id: Uuid,
    user_id: Uuid,
) -> Result<(), AuthzError> {
    if !Membership::is_member(pool, organization_id, user_id).await? {
        return Err(AuthzError::NotMember(organization_id));
    }

    Ok(())
}

/// Ensures the user holds `required_role` or higher
///
/// # Returns
///
/// The user's actual role
pub async fn require_role(
    pool: &PgPool,
    organization_id: Uuid,
    user_id: Uuid,
    required_role: OrgRole,
) -> Result<OrgRole, AuthzError> {
    let actual = Membership::get_role(pool, organization_id, user_id)
        .await?
        .ok_or(AuthzError::NotMember(organization_id))?;

    check_role(actual, required_role)?;
    Ok(actual)
}

/// Ensures the user may perform an action at the given permission level
pub async fn require_permission(
    pool: &PgPool,
    organization_id: Uuid,
    user_id: Uuid,
    permission: ResourcePermission,
) -> Result<OrgRole, AuthzError> {
    require_role(pool, organization_id, user_id, permission.min_role()).await
}

fn check_role(actual: OrgRole, required: OrgRole) -> Result<(), AuthzError> {
    if !actual.has_permission(&required) {
        return Err(AuthzError::InsufficientRole { required, actual });
    }

    Ok(())
}
