/// Transaction loop model
///
/// A loop tracks one real-estate deal through to closing. Every query is
/// scoped by `organization_id`; a loop in another organization is reported
/// as missing.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE loop_status AS ENUM ('DRAFT', 'ACTIVE', 'UNDER_CONTRACT', 'CLOSED', 'CANCELLED');
///
/// CREATE TABLE transaction_loops (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     property_address VARCHAR(512) NOT NULL,
///     status loop_status NOT NULL DEFAULT 'DRAFT',
///     created_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "loop_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoopStatus {
    Draft,
    Active,
    UnderContract,
    Closed,
    Cancelled,
}

/// Transaction loop row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TransactionLoop {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub property_address: String,
    pub status: LoopStatus,

    /// Creator; always allowed to modify the loop
    pub created_by: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a loop
#[derive(Debug, Clone)]
pub struct CreateTransactionLoop {
    pub organization_id: Uuid,
    pub property_address: String,
    pub created_by: Uuid,
}

/// Partial update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTransactionLoop {
    pub property_address: Option<String>,
    pub status: Option<LoopStatus>,
}

impl TransactionLoop {
    pub async fn create<'e, E>(
        executor: E,
        data: CreateTransactionLoop,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TransactionLoop>(
            r#"
            INSERT INTO transaction_loops (organization_id, property_address, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, organization_id, property_address, status, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.property_address)
        .bind(data.created_by)
        .fetch_one(executor)
        .await
    }

    /// Finds a loop by ID within an organization
    pub async fn find<'e, E>(
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TransactionLoop>(
            r#"
            SELECT id, organization_id, property_address, status, created_by,
                   created_at, updated_at
            FROM transaction_loops
            WHERE organization_id = $1 AND id = $2
            "#,
        )
        .bind(organization_id)
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists an organization's loops, newest first
    pub async fn list_by_organization<'e, E>(
        executor: E,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TransactionLoop>(
            r#"
            SELECT id, organization_id, property_address, status, created_by,
                   created_at, updated_at
            FROM transaction_loops
            WHERE organization_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(executor)
        .await
    }

    /// Applies a partial update
    ///
    /// # Returns
    ///
    /// The updated loop, or None if it does not exist in the organization
    pub async fn update<'e, E>(
        executor: E,
        organization_id: Uuid,
        id: Uuid,
        data: UpdateTransactionLoop,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TransactionLoop>(
            r#"
            UPDATE transaction_loops
            SET property_address = COALESCE($3, property_address),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE organization_id = $1 AND id = $2
            RETURNING id, organization_id, property_address, status, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(id)
        .bind(data.property_address)
        .bind(data.status)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a loop
    ///
    /// # Returns
    ///
    /// True if the loop existed in the organization
    pub async fn delete<'e, E>(
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("DELETE FROM transaction_loops WHERE organization_id = $1 AND id = $2")
                .bind(organization_id)
                .bind(id)
                .execute(executor)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
