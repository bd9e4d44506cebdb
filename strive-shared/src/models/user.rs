/// User model and database operations
///
/// Users are created at signup by the identity provider and are never
/// hard-deleted by the platform. A user reaches tenant data only through
/// `organization_members` rows.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE platform_role AS ENUM ('ADMIN', 'USER', 'CLIENT');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     name VARCHAR(255),
///     role platform_role NOT NULL DEFAULT 'USER',
///     subscription_tier subscription_tier NOT NULL DEFAULT 'FREE',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use strive_shared::models::user::{CreateUser, PlatformRole, User};
/// use strive_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "agent@example.com".to_string(),
///     name: Some("Jane Agent".to_string()),
///     role: PlatformRole::User,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "agent@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use super::subscription::SubscriptionTier;

/// Platform-level role, independent of any organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "platform_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformRole {
    /// Platform operator: sees and affects every tenant
    Admin,

    /// Regular workspace user, resolved through org memberships
    User,

    /// External client portal account
    Client,
}

impl PlatformRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformRole::Admin => "ADMIN",
            PlatformRole::User => "USER",
            PlatformRole::Client => "CLIENT",
        }
    }
}

/// User account row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: PlatformRole,

    /// Tier of the most recently provisioned organization
    pub subscription_tier: SubscriptionTier,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: Option<String>,
    #[serde(default = "default_role")]
    pub role: PlatformRole,
}

fn default_role() -> PlatformRole {
    PlatformRole::User
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already taken (unique constraint
    /// violation) or the database is unreachable.
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, role, subscription_tier, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.name)
        .bind(data.role)
        .fetch_one(executor)
        .await
    }

    /// Finds a user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, role, subscription_tier, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Finds a user by email (exact match)
    pub async fn find_by_email<'e, E>(
        executor: E,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, role, subscription_tier, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    /// Records the tier a user signed up for
    ///
    /// Called from inside the onboarding completion transaction, so it takes
    /// any executor rather than the pool.
    ///
    /// # Returns
    ///
    /// True if the user row exists and was updated
    pub async fn update_subscription_tier<'e, E>(
        executor: E,
        id: Uuid,
        tier: SubscriptionTier,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE users SET subscription_tier = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(tier)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_role_serde_uses_screaming_case() {
        assert_eq!(serde_json::to_string(&PlatformRole::Admin).unwrap(), "\"ADMIN\"");
        let role: PlatformRole = serde_json::from_str("\"CLIENT\"").unwrap();
        assert_eq!(role, PlatformRole::Client);
    }

    #[test]
    fn test_create_user_defaults_to_user_role() {
        let data: CreateUser =
            serde_json::from_str(r#"{"email":"a@example.com","name":null}"#).unwrap();
        assert_eq!(data.role, PlatformRole::User);
        assert_eq!(PlatformRole::User.as_str(), "USER");
    }
}
