/// Bulk tenant-scoped mutations
///
/// Every bulk call follows the same pipeline:
///
/// 1. Validate the id list (1 to [`MAX_BULK_IDS`])
/// 2. Require at least MEMBER in the caller's organization
/// 3. Load the supplied ids the organization owns; any shortfall rejects the
///    whole batch, so a repeated id fails like a foreign one
/// 4. Apply one `UPDATE` or `DELETE` over exactly those ids
/// 5. Append one audit entry for the call
///
/// Steps 3 and 4 are separate statements, so a concurrent ownership change
/// between them is not detected.
///
/// # Example
///
/// ```no_run
/// use strive_shared::audit::PgAuditSink;
/// use strive_shared::bulk::{tasks::{bulk_update_tasks, TaskAction}, BulkIds};
/// use strive_shared::models::task::TaskStatus;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, actor: Uuid, org: Uuid, ids: Vec<Uuid>) -> Result<(), Box<dyn std::error::Error>> {
/// let audit = PgAuditSink::new(pool.clone());
/// let result = bulk_update_tasks(
///     &pool,
///     &audit,
///     actor,
///     org,
///     BulkIds::new(ids),
///     TaskAction::UpdateStatus(TaskStatus::Done),
/// )
/// .await?;
/// println!("updated {}", result.count);
/// # Ok(())
/// # }
/// ```

pub mod leads;
pub mod tasks;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::audit::AuditSink;
use crate::auth::authorization::AuthzError;
use crate::models::activity_log::CreateActivityLog;

/// Largest accepted batch
pub const MAX_BULK_IDS: u64 = 100;

/// Error type for bulk mutations
#[derive(Debug, thiserror::Error)]
pub enum BulkError {
    #[error("Invalid bulk request")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Some {} not found or you do not have permission to {}", .target.plural(), .verb)]
    PartialOwnership {
        target: BulkTarget,
        verb: &'static str,
    },

    #[error("Assignee not found in your organization")]
    AssigneeNotFound,

    #[error(transparent)]
    Authorization(#[from] AuthzError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Record kind a bulk call operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulkTarget {
    Task,
    Lead,
}

impl BulkTarget {
    /// Resource type stored in the audit log
    pub fn resource_type(&self) -> &'static str {
        match self {
            BulkTarget::Task => "Task",
            BulkTarget::Lead => "Lead",
        }
    }

    fn plural(&self) -> &'static str {
        match self {
            BulkTarget::Task => "tasks",
            BulkTarget::Lead => "leads",
        }
    }
}

/// Audit action recorded for a bulk call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UpdateStatus,
    Assign,
    UpdatePriority,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::UpdateStatus => "BULK_UPDATE_STATUS",
            AuditAction::Assign => "BULK_ASSIGN",
            AuditAction::UpdatePriority => "BULK_UPDATE_PRIORITY",
            AuditAction::Delete => "BULK_DELETE",
        }
    }

    /// Wording used in the ownership error
    fn verb(&self) -> &'static str {
        match self {
            AuditAction::Delete => "delete them",
            _ => "modify them",
        }
    }
}

/// Id list submitted to a bulk endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkIds {
    #[validate(length(min = 1, max = MAX_BULK_IDS, message = "Between 1 and 100 ids are required"))]
    pub ids: Vec<Uuid>,
}

impl BulkIds {
    pub fn new(ids: Vec<Uuid>) -> Self {
        Self { ids }
    }

    /// Validates the batch size
    pub fn into_verified(self) -> Result<Vec<Uuid>, BulkError> {
        self.validate()?;
        Ok(self.ids)
    }
}

/// Result of a bulk call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    pub count: u64,
}

/// Rejects the batch unless every requested id is owned
///
/// `owned` holds distinct rows, so its length must match `requested`
/// exactly.
pub fn check_ownership(
    requested: &[Uuid],
    owned: &[Uuid],
    target: BulkTarget,
    action: AuditAction,
) -> Result<(), BulkError> {
    let owned: HashSet<&Uuid> = owned.iter().collect();

    if owned.len() == requested.len() && requested.iter().all(|id| owned.contains(id)) {
        Ok(())
    } else {
        Err(BulkError::PartialOwnership {
            target,
            verb: action.verb(),
        })
    }
}

/// Writes the audit entry for a finished call, logging instead of failing
pub(crate) async fn record_audit(
    audit: &dyn AuditSink,
    actor_id: Uuid,
    organization_id: Uuid,
    target: BulkTarget,
    action: AuditAction,
    ids: Vec<Uuid>,
    payload: JsonValue,
) {
    let entry = CreateActivityLog {
        user_id: actor_id,
        organization_id,
        action: action.as_str().to_string(),
        resource_type: target.resource_type().to_string(),
        resource_ids: ids,
        payload,
    };

    if let Err(e) = audit.record(entry).await {
        warn!(
            organization_id = %organization_id,
            action = action.as_str(),
            error = %e,
            "Failed to record bulk audit entry"
        );
    }
}
