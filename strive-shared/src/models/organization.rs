/// Organization model and database operations
///
/// An organization is the tenant boundary. Every business record carries an
/// `organization_id`, directly or through its parent project.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     slug VARCHAR(255) NOT NULL,
///     website VARCHAR(512),
///     description TEXT,
///     subscription_tier subscription_tier NOT NULL DEFAULT 'FREE',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT organizations_slug_key UNIQUE (slug)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use super::subscription::SubscriptionTier;

/// Name of the unique constraint guarding organization slugs
pub const SLUG_UNIQUE_CONSTRAINT: &str = "organizations_slug_key";

/// Organization row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,

    /// URL-safe unique identifier derived from the name
    pub slug: String,

    pub website: Option<String>,
    pub description: Option<String>,
    pub subscription_tier: SubscriptionTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an organization
#[derive(Debug, Clone)]
pub struct CreateOrganization {
    pub name: String,
    pub slug: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub subscription_tier: SubscriptionTier,
}

impl Organization {
    /// Creates a new organization
    ///
    /// # Errors
    ///
    /// Returns a database error carrying [`SLUG_UNIQUE_CONSTRAINT`] when the
    /// slug was claimed concurrently. Callers detect it with
    /// [`is_slug_conflict`].
    pub async fn create<'e, E>(executor: E, data: CreateOrganization) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, slug, website, description, subscription_tier)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, slug, website, description, subscription_tier, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.slug)
        .bind(data.website)
        .bind(data.description)
        .bind(data.subscription_tier)
        .fetch_one(executor)
        .await
    }

    /// Finds an organization by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, slug, website, description, subscription_tier, created_at, updated_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Checks whether a slug is already taken
    pub async fn slug_exists<'e, E>(executor: E, slug: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM organizations WHERE slug = $1)")
                .bind(slug)
                .fetch_one(executor)
                .await?;

        Ok(exists.0)
    }
}

/// Returns true if the error is a unique violation on the slug constraint
pub fn is_slug_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint() == Some(SLUG_UNIQUE_CONSTRAINT),
        _ => false,
    }
}
