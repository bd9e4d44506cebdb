/// Transaction-loop permission resolver
///
/// Pure and synchronous. The decision table below is the only source of
/// truth for loop permissions; nothing else in the crate grants them.
///
/// | Permission     | Platform ADMIN | OWNER | ADMIN | MEMBER | VIEWER | none |
/// |----------------|----------------|-------|-------|--------|--------|------|
/// | `ViewLoops`    | allow          | allow | allow | allow  | allow  | deny |
/// | `CreateLoops`  | allow          | allow | allow | allow  | deny   | deny |
/// | `UpdateLoops`  | allow          | allow | allow | allow  | deny   | deny |
/// | `DeleteLoops`  | allow          | allow | allow | deny   | deny   | deny |
/// | `ManageAll`    | allow          | allow | deny  | deny   | deny   | deny |
///
/// Platform `CLIENT` accounts are denied everything regardless of their
/// memberships.
///
/// # Example
///
/// ```
/// use strive_shared::auth::identity::AuthUser;
/// use strive_shared::auth::rbac::{has_permission, Permission};
/// use strive_shared::models::user::PlatformRole;
/// use uuid::Uuid;
///
/// let admin = AuthUser {
///     id: Uuid::new_v4(),
///     email: "ops@example.com".to_string(),
///     role: PlatformRole::Admin,
///     organization_id: None,
///     memberships: vec![],
/// };
/// assert!(has_permission(&admin, Permission::ManageAll));
/// ```

use serde::{Deserialize, Serialize};

use super::identity::AuthUser;
use crate::models::membership::OrgRole;
use crate::models::transaction_loop::TransactionLoop;
use crate::models::user::PlatformRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    ViewLoops,
    CreateLoops,
    UpdateLoops,
    DeleteLoops,
    ManageAll,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Permission::ViewLoops,
        Permission::CreateLoops,
        Permission::UpdateLoops,
        Permission::DeleteLoops,
        Permission::ManageAll,
    ];

    /// Org roles that satisfy this permission
    pub fn granted_to(&self) -> &'static [OrgRole] {
        match self {
            Permission::ViewLoops => &[OrgRole::Owner, OrgRole::Admin, OrgRole::Member, OrgRole::Viewer],
            Permission::CreateLoops => &[OrgRole::Owner, OrgRole::Admin, OrgRole::Member],
            Permission::UpdateLoops => &[OrgRole::Owner, OrgRole::Admin, OrgRole::Member],
            Permission::DeleteLoops => &[OrgRole::Owner, OrgRole::Admin],
            Permission::ManageAll => &[OrgRole::Owner],
        }
    }
}

/// Decides whether `user` holds `permission` in its active organization
pub fn has_permission(user: &AuthUser, permission: Permission) -> bool {
    match user.role {
        PlatformRole::Admin => true,
        PlatformRole::Client => false,
        PlatformRole::User => {
            let granted = permission.granted_to();
            user.memberships.iter().any(|m| granted.contains(&m.role))
        }
    }
}

/// Decides whether `user` may edit `transaction_loop`
///
/// The creator always may. Anyone else needs platform ADMIN or an org
/// role of OWNER or ADMIN.
pub fn can_modify_loop(user: &AuthUser, transaction_loop: &TransactionLoop) -> bool {
    if transaction_loop.created_by == user.id {
        return true;
    }

    match user.role {
        PlatformRole::Admin => true,
        PlatformRole::Client => false,
        PlatformRole::User => user
            .memberships
            .iter()
            .any(|m| matches!(m.role, OrgRole::Owner | OrgRole::Admin)),
    }
}
