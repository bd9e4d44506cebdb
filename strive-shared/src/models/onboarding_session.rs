/// Onboarding session model
///
/// A session stages the data a new user enters across the signup steps
/// (organization details, plan, payment) before anything tenant-scoped is
/// provisioned. Sessions are addressed by their opaque token, never by id.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE payment_status AS ENUM ('PENDING', 'SUCCEEDED', 'FAILED');
///
/// CREATE TABLE onboarding_sessions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     session_token VARCHAR(64) NOT NULL UNIQUE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     current_step INTEGER NOT NULL DEFAULT 1,
///     total_steps INTEGER NOT NULL DEFAULT 4,
///     org_name VARCHAR(255),
///     org_website VARCHAR(512),
///     org_description TEXT,
///     selected_tier subscription_tier,
///     billing_cycle billing_cycle,
///     payment_status payment_status NOT NULL DEFAULT 'PENDING',
///     payment_intent_id VARCHAR(255),
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     completed_at TIMESTAMPTZ,
///     organization_id UUID REFERENCES organizations(id) ON DELETE SET NULL,
///     expires_at TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use super::subscription::{BillingCycle, SubscriptionTier};

/// Number of steps in the signup flow
pub const TOTAL_STEPS: i32 = 4;

/// Outcome of the payment step, as reported by the payment provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

/// Onboarding session row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OnboardingSession {
    pub id: Uuid,
    pub session_token: String,
    pub user_id: Uuid,
    pub current_step: i32,
    pub total_steps: i32,

    // Step 1
    pub org_name: Option<String>,
    pub org_website: Option<String>,
    pub org_description: Option<String>,

    // Step 2
    pub selected_tier: Option<SubscriptionTier>,
    pub billing_cycle: Option<BillingCycle>,

    // Step 3
    pub payment_status: PaymentStatus,
    pub payment_intent_id: Option<String>,

    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,

    /// Organization provisioned on completion
    pub organization_id: Option<Uuid>,

    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a session
#[derive(Debug, Clone)]
pub struct CreateOnboardingSession {
    pub session_token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

const SESSION_COLUMNS: &str = "id, session_token, user_id, current_step, total_steps, \
    org_name, org_website, org_description, selected_tier, billing_cycle, \
    payment_status, payment_intent_id, is_completed, completed_at, organization_id, \
    expires_at, created_at, updated_at";

impl OnboardingSession {
    /// Checks if the session is past its expiry at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Creates a new session at step 1
    pub async fn create<'e, E>(
        executor: E,
        data: CreateOnboardingSession,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            INSERT INTO onboarding_sessions (session_token, user_id, total_steps, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {SESSION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, OnboardingSession>(&query)
            .bind(data.session_token)
            .bind(data.user_id)
            .bind(TOTAL_STEPS)
            .bind(data.expires_at)
            .fetch_one(executor)
            .await
    }

    /// Finds a session by its token
    pub async fn find_by_token<'e, E>(
        executor: E,
        session_token: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query =
            format!("SELECT {SESSION_COLUMNS} FROM onboarding_sessions WHERE session_token = $1");

        sqlx::query_as::<_, OnboardingSession>(&query)
            .bind(session_token)
            .fetch_optional(executor)
            .await
    }

    /// Stores the organization details entered in step 1
    ///
    /// `current_step` only moves forward and never past `total_steps`.
    pub async fn update_org_details<'e, E>(
        executor: E,
        id: Uuid,
        org_name: &str,
        org_website: Option<&str>,
        org_description: Option<&str>,
        next_step: i32,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            UPDATE onboarding_sessions
            SET org_name = $2,
                org_website = $3,
                org_description = $4,
                current_step = LEAST(GREATEST(current_step, $5), total_steps),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, OnboardingSession>(&query)
            .bind(id)
            .bind(org_name)
            .bind(org_website)
            .bind(org_description)
            .bind(next_step)
            .fetch_one(executor)
            .await
    }

    /// Stores the plan chosen in step 2
    pub async fn update_plan<'e, E>(
        executor: E,
        id: Uuid,
        tier: SubscriptionTier,
        billing_cycle: BillingCycle,
        next_step: i32,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            UPDATE onboarding_sessions
            SET selected_tier = $2,
                billing_cycle = $3,
                current_step = LEAST(GREATEST(current_step, $4), total_steps),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, OnboardingSession>(&query)
            .bind(id)
            .bind(tier)
            .bind(billing_cycle)
            .bind(next_step)
            .fetch_one(executor)
            .await
    }

    /// Records the payment outcome for a session
    ///
    /// A succeeded payment advances the session past the payment step. Once
    /// a session has `SUCCEEDED`, later events leave the status and intent
    /// untouched.
    ///
    /// # Returns
    ///
    /// The updated session, or None if no incomplete session has this token
    pub async fn record_payment<'e, E>(
        executor: E,
        session_token: &str,
        status: PaymentStatus,
        payment_intent_id: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            UPDATE onboarding_sessions
            SET payment_status = CASE
                    WHEN payment_status = 'SUCCEEDED'::payment_status THEN payment_status
                    ELSE $2
                END,
                payment_intent_id = CASE
                    WHEN payment_status = 'SUCCEEDED'::payment_status THEN payment_intent_id
                    ELSE $3
                END,
                current_step = CASE
                    WHEN $2 = 'SUCCEEDED'::payment_status THEN GREATEST(current_step, total_steps)
                    ELSE current_step
                END,
                updated_at = NOW()
            WHERE session_token = $1 AND is_completed = FALSE
            RETURNING {SESSION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, OnboardingSession>(&query)
            .bind(session_token)
            .bind(status)
            .bind(payment_intent_id)
            .fetch_optional(executor)
            .await
    }

    /// Marks a session completed and links the provisioned organization
    ///
    /// # Returns
    ///
    /// True if an incomplete session was updated
    pub async fn mark_completed<'e, E>(
        executor: E,
        id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE onboarding_sessions
            SET is_completed = TRUE,
                completed_at = NOW(),
                organization_id = $2,
                current_step = total_steps,
                updated_at = NOW()
            WHERE id = $1 AND is_completed = FALSE
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes expired sessions that were never completed
    ///
    /// # Returns
    ///
    /// Number of sessions deleted
    pub async fn delete_expired<'e, E>(executor: E) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "DELETE FROM onboarding_sessions WHERE expires_at < NOW() AND is_completed = FALSE",
        )
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
