/// Subscription model and billing enums
///
/// Every organization has exactly one subscription row, created in the same
/// transaction as the organization itself.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE subscriptions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID NOT NULL UNIQUE REFERENCES organizations(id) ON DELETE CASCADE,
///     tier subscription_tier NOT NULL,
///     status subscription_status NOT NULL DEFAULT 'ACTIVE',
///     billing_cycle billing_cycle NOT NULL DEFAULT 'MONTHLY',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Subscription tiers, cheapest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_tier", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    /// No charge; skips payment during onboarding
    Free,

    /// Pay-per-tool marketplace access
    Custom,

    Starter,
    Growth,
    Elite,
    Enterprise,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "FREE",
            SubscriptionTier::Custom => "CUSTOM",
            SubscriptionTier::Starter => "STARTER",
            SubscriptionTier::Growth => "GROWTH",
            SubscriptionTier::Elite => "ELITE",
            SubscriptionTier::Enterprise => "ENTERPRISE",
        }
    }

    /// Whether selecting this tier requires a confirmed payment
    pub fn is_paid(&self) -> bool {
        !matches!(self, SubscriptionTier::Free)
    }
}

/// Lifecycle state of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
}

/// How often a paid subscription is billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "billing_cycle", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl Default for BillingCycle {
    fn default() -> Self {
        BillingCycle::Monthly
    }
}

/// Subscription row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub tier: SubscriptionTier,
    pub status: SubscriptionStatus,
    pub billing_cycle: BillingCycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a subscription
#[derive(Debug, Clone)]
pub struct CreateSubscription {
    pub organization_id: Uuid,
    pub tier: SubscriptionTier,
    pub status: SubscriptionStatus,
    pub billing_cycle: BillingCycle,
}

impl Subscription {
    /// Creates the subscription for an organization
    ///
    /// # Errors
    ///
    /// Fails on the `organization_id` unique constraint if the organization
    /// already has a subscription.
    pub async fn create<'e, E>(executor: E, data: CreateSubscription) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (organization_id, tier, status, billing_cycle)
            VALUES ($1, $2, $3, $4)
            RETURNING id, organization_id, tier, status, billing_cycle, created_at, updated_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.tier)
        .bind(data.status)
        .bind(data.billing_cycle)
        .fetch_one(executor)
        .await
    }

    /// Finds the subscription belonging to an organization
    pub async fn find_by_organization<'e, E>(
        executor: E,
        organization_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, organization_id, tier, status, billing_cycle, created_at, updated_at
            FROM subscriptions
            WHERE organization_id = $1
            "#,
        )
        .bind(organization_id)
        .fetch_optional(executor)
        .await
    }
}
