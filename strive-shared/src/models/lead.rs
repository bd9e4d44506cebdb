/// CRM lead model
///
/// Leads carry their `organization_id` directly.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE lead_status AS ENUM (
///     'NEW_LEAD', 'IN_CONTACT', 'QUALIFIED', 'UNQUALIFIED', 'CONVERTED', 'LOST'
/// );
///
/// CREATE TABLE leads (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255),
///     status lead_status NOT NULL DEFAULT 'NEW_LEAD',
///     assigned_to_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Pipeline stage of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "lead_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    NewLead,
    InContact,
    Qualified,
    Unqualified,
    Converted,
    Lost,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::NewLead => "NEW_LEAD",
            LeadStatus::InContact => "IN_CONTACT",
            LeadStatus::Qualified => "QUALIFIED",
            LeadStatus::Unqualified => "UNQUALIFIED",
            LeadStatus::Converted => "CONVERTED",
            LeadStatus::Lost => "LOST",
        }
    }
}

/// Lead row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub status: LeadStatus,
    pub assigned_to_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A lead id with its name, as returned by the ownership check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeadRef {
    pub id: Uuid,
    pub name: String,
}

impl Lead {
    /// Creates a lead in an organization
    pub async fn create<'e, E>(
        executor: E,
        organization_id: Uuid,
        name: &str,
        email: Option<&str>,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (organization_id, name, email)
            VALUES ($1, $2, $3)
            RETURNING id, organization_id, name, email, status, assigned_to_id,
                      created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(name)
        .bind(email)
        .fetch_one(executor)
        .await
    }

    /// Finds a lead by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Lead>(
            r#"
            SELECT id, organization_id, name, email, status, assigned_to_id,
                   created_at, updated_at
            FROM leads
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Returns the subset of `ids` that belong to the organization
    pub async fn find_owned<'e, E>(
        executor: E,
        ids: &[Uuid],
        organization_id: Uuid,
    ) -> Result<Vec<LeadRef>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, LeadRef>(
            "SELECT id, name FROM leads WHERE id = ANY($1) AND organization_id = $2",
        )
        .bind(ids)
        .bind(organization_id)
        .fetch_all(executor)
        .await
    }

    pub async fn update_status_many<'e, E>(
        executor: E,
        ids: &[Uuid],
        status: LeadStatus,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("UPDATE leads SET status = $2, updated_at = NOW() WHERE id = ANY($1)")
                .bind(ids)
                .bind(status)
                .execute(executor)
                .await?;

        Ok(result.rows_affected())
    }

    pub async fn assign_many<'e, E>(
        executor: E,
        ids: &[Uuid],
        assignee_id: Uuid,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE leads SET assigned_to_id = $2, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(assignee_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_many<'e, E>(executor: E, ids: &[Uuid]) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM leads WHERE id = ANY($1)")
            .bind(ids)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
