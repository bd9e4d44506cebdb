/// Project model
///
/// Projects group tasks inside an organization. Tasks carry no
/// `organization_id` of their own; tenancy is resolved through the project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project in an organization
    pub async fn create<'e, E>(
        executor: E,
        organization_id: Uuid,
        name: &str,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (organization_id, name)
            VALUES ($1, $2)
            RETURNING id, organization_id, name, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(name)
        .fetch_one(executor)
        .await
    }
}
