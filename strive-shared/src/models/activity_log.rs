/// Activity log model
///
/// Append-only record of user actions within an organization. Rows are
/// written through [`crate::audit::AuditSink`] and never updated.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE activity_logs (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     action VARCHAR(64) NOT NULL,
///     resource_type VARCHAR(64) NOT NULL,
///     resource_ids UUID[] NOT NULL DEFAULT '{}',
///     payload JSONB NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgExecutor;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub organization_id: Uuid,
    pub action: String,
    pub resource_type: String,
    pub resource_ids: Vec<Uuid>,
    pub payload: JsonValue,
    pub created_at: DateTime<Utc>,
}

/// Input for appending an activity entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateActivityLog {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub action: String,
    pub resource_type: String,
    pub resource_ids: Vec<Uuid>,
    pub payload: JsonValue,
}

impl ActivityLog {
    pub async fn create<'e, E>(executor: E, data: CreateActivityLog) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, ActivityLog>(
            r#"
            INSERT INTO activity_logs
                (user_id, organization_id, action, resource_type, resource_ids, payload)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, organization_id, action, resource_type, resource_ids,
                      payload, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.organization_id)
        .bind(data.action)
        .bind(data.resource_type)
        .bind(data.resource_ids)
        .bind(data.payload)
        .fetch_one(executor)
        .await
    }

    /// Lists the most recent entries for an organization
    pub async fn list_recent<'e, E>(
        executor: E,
        organization_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT id, user_id, organization_id, action, resource_type, resource_ids,
                   payload, created_at
            FROM activity_logs
            WHERE organization_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(organization_id)
        .bind(limit)
        .fetch_all(executor)
        .await
    }
}
