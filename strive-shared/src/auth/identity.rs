/// Current-user resolution
///
/// Turns the identity asserted by a token ([`AuthContext`]) into the user
/// record the resolver works on: platform role plus the memberships of the
/// organization the request acts in.
///
/// # Active organization
///
/// 1. The token's `org` claim, if the user is a member of it (or is a
///    platform admin, who may act in any organization).
/// 2. Otherwise, when the token names no organization, the user's oldest
///    membership.
///
/// A token naming an organization the user does not belong to yields no
/// active organization and no memberships, so every org-scoped check denies.

use sqlx::PgPool;
use uuid::Uuid;

use super::authorization::AuthzError;
use super::middleware::AuthContext;
use crate::models::membership::{Membership, OrgRole};
use crate::models::user::{PlatformRole, User};

/// Authenticated user with the memberships loaded for one organization
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: PlatformRole,

    /// Organization this request acts in
    pub organization_id: Option<Uuid>,

    /// Memberships in the active organization
    pub memberships: Vec<Membership>,
}

impl AuthUser {
    pub fn is_platform_admin(&self) -> bool {
        self.role == PlatformRole::Admin
    }

    /// Role in the active organization, if a member
    pub fn org_role(&self) -> Option<OrgRole> {
        self.memberships.iter().map(|m| m.role).max_by_key(OrgRole::level)
    }

    /// Returns the active organization or fails with `NoActiveOrganization`
    pub fn require_organization(&self) -> Result<Uuid, AuthzError> {
        self.organization_id.ok_or(AuthzError::NoActiveOrganization)
    }
}

/// Picks the active organization from the token claim and the user's
/// memberships (oldest first)
fn select_active_organization(
    requested: Option<Uuid>,
    role: PlatformRole,
    memberships: &[Membership],
) -> Option<Uuid> {
    match requested {
        Some(org_id) => {
            let is_member = memberships.iter().any(|m| m.organization_id == org_id);
            (is_member || role == PlatformRole::Admin).then_some(org_id)
        }
        None => memberships.first().map(|m| m.organization_id),
    }
}

/// Loads the current user for an authenticated request
///
/// # Returns
///
/// None when the token's subject no longer exists
pub async fn load_current_user(
    pool: &PgPool,
    auth: &AuthContext,
) -> Result<Option<AuthUser>, sqlx::Error> {
    let Some(user) = User::find_by_id(pool, auth.user_id).await? else {
        tracing::debug!(user_id = %auth.user_id, "Token subject not found");
        return Ok(None);
    };

    let all_memberships = Membership::list_for_user(pool, user.id).await?;
    let organization_id =
        select_active_organization(auth.organization_id, user.role, &all_memberships);

    let memberships = all_memberships
        .into_iter()
        .filter(|m| Some(m.organization_id) == organization_id)
        .collect();

    Ok(Some(AuthUser {
        id: user.id,
        email: user.email,
        role: user.role,
        organization_id,
        memberships,
    }))
}

/// Loads the current user or fails with `Unauthenticated`
pub async fn require_auth(pool: &PgPool, auth: &AuthContext) -> Result<AuthUser, AuthzError> {
    load_current_user(pool, auth)
        .await?
        .ok_or(AuthzError::Unauthenticated)
}
