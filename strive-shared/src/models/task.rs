/// Task model and bulk database operations
///
/// Tasks belong to a project, which belongs to an organization. Every
/// operation here that touches more than one row takes an explicit id set
/// that the caller has already verified against its organization.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('TODO', 'IN_PROGRESS', 'REVIEW', 'DONE', 'CANCELLED');
/// CREATE TYPE task_priority AS ENUM ('LOW', 'MEDIUM', 'HIGH', 'CRITICAL');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     status task_status NOT NULL DEFAULT 'TODO',
///     priority task_priority NOT NULL DEFAULT 'MEDIUM',
///     assigned_to_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_by_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use strive_shared::models::task::{Task, TaskStatus};
/// use strive_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(organization_id: Uuid, ids: Vec<Uuid>) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let owned = Task::find_owned(&pool, &ids, organization_id).await?;
/// if owned.len() == ids.len() {
///     Task::update_status_many(&pool, &ids, TaskStatus::Done).await?;
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Done,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Review => "REVIEW",
            TaskStatus::Done => "DONE",
            TaskStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
            TaskPriority::Critical => "CRITICAL",
        }
    }
}

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to_id: Option<Uuid>,
    pub created_by_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task id with its title, as returned by the ownership check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskRef {
    pub id: Uuid,
    pub title: String,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub title: String,
    pub created_by_id: Option<Uuid>,
}

impl Task {
    /// Creates a task with default status and priority
    pub async fn create<'e, E>(executor: E, data: CreateTask) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, created_by_id)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, title, status, priority, assigned_to_id,
                      created_by_id, created_at, updated_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.created_by_id)
        .fetch_one(executor)
        .await
    }

    /// Finds a task by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, status, priority, assigned_to_id,
                   created_by_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Returns the subset of `ids` whose project belongs to the organization
    pub async fn find_owned<'e, E>(
        executor: E,
        ids: &[Uuid],
        organization_id: Uuid,
    ) -> Result<Vec<TaskRef>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TaskRef>(
            r#"
            SELECT t.id, t.title
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE t.id = ANY($1) AND p.organization_id = $2
            "#,
        )
        .bind(ids)
        .bind(organization_id)
        .fetch_all(executor)
        .await
    }

    /// Sets the status of every task in `ids`
    pub async fn update_status_many<'e, E>(
        executor: E,
        ids: &[Uuid],
        status: TaskStatus,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("UPDATE tasks SET status = $2, updated_at = NOW() WHERE id = ANY($1)")
                .bind(ids)
                .bind(status)
                .execute(executor)
                .await?;

        Ok(result.rows_affected())
    }

    /// Sets the priority of every task in `ids`
    pub async fn update_priority_many<'e, E>(
        executor: E,
        ids: &[Uuid],
        priority: TaskPriority,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("UPDATE tasks SET priority = $2, updated_at = NOW() WHERE id = ANY($1)")
                .bind(ids)
                .bind(priority)
                .execute(executor)
                .await?;

        Ok(result.rows_affected())
    }

    /// Assigns every task in `ids` to a user
    pub async fn assign_many<'e, E>(
        executor: E,
        ids: &[Uuid],
        assignee_id: Uuid,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE tasks SET assigned_to_id = $2, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(assignee_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes every task in `ids`
    pub async fn delete_many<'e, E>(executor: E, ids: &[Uuid]) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ANY($1)")
            .bind(ids)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
