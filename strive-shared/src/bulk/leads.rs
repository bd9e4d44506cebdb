/// Bulk lead mutations

use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{check_ownership, record_audit, AuditAction, BulkError, BulkIds, BulkResult, BulkTarget};
use crate::audit::AuditSink;
use crate::auth::authorization::{require_permission, ResourcePermission};
use crate::models::lead::{Lead, LeadStatus};
use crate::models::membership::Membership;

/// Mutation applied to every lead in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadAction {
    UpdateStatus(LeadStatus),
    Assign(Uuid),
    Delete,
}

impl LeadAction {
    fn audit_action(&self) -> AuditAction {
        match self {
            LeadAction::UpdateStatus(_) => AuditAction::UpdateStatus,
            LeadAction::Assign(_) => AuditAction::Assign,
            LeadAction::Delete => AuditAction::Delete,
        }
    }
}

/// Applies `action` to every lead in `ids` owned by `organization_id`
pub async fn bulk_update_leads(
    pool: &PgPool,
    audit: &dyn AuditSink,
    actor_id: Uuid,
    organization_id: Uuid,
    ids: BulkIds,
    action: LeadAction,
) -> Result<BulkResult, BulkError> {
    let ids = ids.into_verified()?;
    require_permission(pool, organization_id, actor_id, ResourcePermission::Write).await?;

    let audit_action = action.audit_action();
    let owned = Lead::find_owned(pool, &ids, organization_id).await?;
    let owned_ids: Vec<Uuid> = owned.iter().map(|l| l.id).collect();
    check_ownership(&ids, &owned_ids, BulkTarget::Lead, audit_action)?;

    let (count, payload) = match action {
        LeadAction::UpdateStatus(status) => {
            let count = Lead::update_status_many(pool, &ids, status).await?;
            (count, json!({ "status": status, "count": count, "ids": ids }))
        }
        LeadAction::Assign(assignee_id) => {
            if !Membership::is_member(pool, organization_id, assignee_id).await? {
                return Err(BulkError::AssigneeNotFound);
            }
            let count = Lead::assign_many(pool, &ids, assignee_id).await?;
            (count, json!({ "assigned_to_id": assignee_id, "count": count, "ids": ids }))
        }
        LeadAction::Delete => {
            let names: Vec<&str> = owned.iter().map(|l| l.name.as_str()).collect();
            let count = Lead::delete_many(pool, &ids).await?;
            (count, json!({ "count": count, "ids": ids, "names": names }))
        }
    };

    info!(
        organization_id = %organization_id,
        actor_id = %actor_id,
        action = audit_action.as_str(),
        count,
        "Bulk lead mutation applied"
    );

    record_audit(
        audit,
        actor_id,
        organization_id,
        BulkTarget::Lead,
        audit_action,
        ids,
        payload,
    )
    .await;

    Ok(BulkResult { count })
}
