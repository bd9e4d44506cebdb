/// Bulk task mutations
///
/// Task ownership is checked through the owning project's organization.

use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{check_ownership, record_audit, AuditAction, BulkError, BulkIds, BulkResult, BulkTarget};
use crate::audit::AuditSink;
use crate::auth::authorization::{require_permission, ResourcePermission};
use crate::models::membership::Membership;
use crate::models::task::{Task, TaskPriority, TaskStatus};

/// Mutation applied to every task in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskAction {
    UpdateStatus(TaskStatus),
    Assign(Uuid),
    UpdatePriority(TaskPriority),
    Delete,
}

impl TaskAction {
    fn audit_action(&self) -> AuditAction {
        match self {
            TaskAction::UpdateStatus(_) => AuditAction::UpdateStatus,
            TaskAction::Assign(_) => AuditAction::Assign,
            TaskAction::UpdatePriority(_) => AuditAction::UpdatePriority,
            TaskAction::Delete => AuditAction::Delete,
        }
    }
}

/// Applies `action` to every task in `ids` owned by `organization_id`
pub async fn bulk_update_tasks(
    pool: &PgPool,
    audit: &dyn AuditSink,
    actor_id: Uuid,
    organization_id: Uuid,
    ids: BulkIds,
    action: TaskAction,
) -> Result<BulkResult, BulkError> {
    let ids = ids.into_verified()?;
    require_permission(pool, organization_id, actor_id, ResourcePermission::Write).await?;

    let audit_action = action.audit_action();
    let owned = Task::find_owned(pool, &ids, organization_id).await?;
    let owned_ids: Vec<Uuid> = owned.iter().map(|t| t.id).collect();
    check_ownership(&ids, &owned_ids, BulkTarget::Task, audit_action)?;

    let (count, payload) = match action {
        TaskAction::UpdateStatus(status) => {
            let count = Task::update_status_many(pool, &ids, status).await?;
            (count, json!({ "status": status, "count": count, "ids": ids }))
        }
        TaskAction::Assign(assignee_id) => {
            if !Membership::is_member(pool, organization_id, assignee_id).await? {
                return Err(BulkError::AssigneeNotFound);
            }
            let count = Task::assign_many(pool, &ids, assignee_id).await?;
            (count, json!({ "assigned_to_id": assignee_id, "count": count, "ids": ids }))
        }
        TaskAction::UpdatePriority(priority) => {
            let count = Task::update_priority_many(pool, &ids, priority).await?;
            (count, json!({ "priority": priority, "count": count, "ids": ids }))
        }
        TaskAction::Delete => {
            let titles: Vec<&str> = owned.iter().map(|t| t.title.as_str()).collect();
            let count = Task::delete_many(pool, &ids).await?;
            (count, json!({ "count": count, "ids": ids, "titles": titles }))
        }
    };

    info!(
        organization_id = %organization_id,
        actor_id = %actor_id,
        action = audit_action.as_str(),
        count,
        "Bulk task mutation applied"
    );

    record_audit(
        audit,
        actor_id,
        organization_id,
        BulkTarget::Task,
        audit_action,
        ids,
        payload,
    )
    .await;

    Ok(BulkResult { count })
}
