/// Onboarding completion
///
/// Turns a fully stepped session into a live tenant. Preconditions are
/// checked before any write; the writes themselves run in one transaction:
///
/// 1. Create the organization under a free slug
/// 2. Create its ACTIVE subscription
/// 3. Add the session's user as OWNER
/// 4. Sync the user's subscription tier
/// 5. Mark the session completed
///
/// Two sessions racing for the same slug are serialized by the unique
/// constraint on `organizations.slug`; the loser rolls back and probes again.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

use super::session::{ensure_open, get_session};
use super::slug::{find_available_slug, slugify};
use super::OnboardingError;
use crate::models::membership::{CreateMembership, Membership, OrgRole};
use crate::models::onboarding_session::{OnboardingSession, PaymentStatus};
use crate::models::organization::{is_slug_conflict, CreateOrganization, Organization};
use crate::models::subscription::{
    BillingCycle, CreateSubscription, Subscription, SubscriptionStatus, SubscriptionTier,
};
use crate::models::user::User;

/// Transaction attempts before giving up on slug races
pub const MAX_COMPLETION_ATTEMPTS: u32 = 3;

/// Records provisioned by a completed onboarding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResult {
    pub organization: Organization,
    pub subscription: Subscription,
}

/// Outcome of an expired-session sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupResult {
    pub deleted_count: u64,
    pub message: String,
}

/// Validated inputs for provisioning
#[derive(Debug, Clone, PartialEq)]
struct ProvisionPlan {
    user_id: Uuid,
    org_name: String,
    website: Option<String>,
    description: Option<String>,
    tier: SubscriptionTier,
    billing_cycle: BillingCycle,
}

/// Checks step data in order: name, tier, then payment for paid tiers
fn validate_for_completion(session: &OnboardingSession) -> Result<ProvisionPlan, OnboardingError> {
    let org_name = session
        .org_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(OnboardingError::OrganizationNameRequired)?;

    let tier = session.selected_tier.ok_or(OnboardingError::TierRequired)?;

    if tier.is_paid() && session.payment_status != PaymentStatus::Succeeded {
        return Err(OnboardingError::PaymentRequired);
    }

    Ok(ProvisionPlan {
        user_id: session.user_id,
        org_name: org_name.to_string(),
        website: session.org_website.clone(),
        description: session.org_description.clone(),
        tier,
        billing_cycle: session.billing_cycle.unwrap_or_default(),
    })
}

async fn provision(
    tx: &mut Transaction<'_, Postgres>,
    session_id: Uuid,
    plan: &ProvisionPlan,
    slug: String,
) -> Result<CompletionResult, OnboardingError> {
    let organization = Organization::create(
        &mut **tx,
        CreateOrganization {
            name: plan.org_name.clone(),
            slug,
            website: plan.website.clone(),
            description: plan.description.clone(),
            subscription_tier: plan.tier,
        },
    )
    .await?;

    let subscription = Subscription::create(
        &mut **tx,
        CreateSubscription {
            organization_id: organization.id,
            tier: plan.tier,
            status: SubscriptionStatus::Active,
            billing_cycle: plan.billing_cycle,
        },
    )
    .await?;

    Membership::create(
        &mut **tx,
        CreateMembership {
            organization_id: organization.id,
            user_id: plan.user_id,
            role: OrgRole::Owner,
        },
    )
    .await?;

    User::update_subscription_tier(&mut **tx, plan.user_id, plan.tier).await?;

    // Another request completed the session after our read
    if !OnboardingSession::mark_completed(&mut **tx, session_id, organization.id).await? {
        return Err(OnboardingError::AlreadyCompleted);
    }

    Ok(CompletionResult {
        organization,
        subscription,
    })
}

/// Completes the session identified by `session_token`
///
/// # Errors
///
/// In check order: `SessionNotFound`, `AlreadyCompleted`, `SessionExpired`,
/// `OrganizationNameRequired`, `TierRequired`, `PaymentRequired`. Nothing
/// is written when any of these is returned. `SlugExhausted` is returned
/// when no free slug could be claimed.
pub async fn complete_onboarding(
    pool: &PgPool,
    session_token: &str,
) -> Result<CompletionResult, OnboardingError> {
    let session = get_session(pool, session_token).await?;
    ensure_open(&session)?;
    let plan = validate_for_completion(&session)?;
    let base_slug = slugify(&plan.org_name);

    for attempt in 1..=MAX_COMPLETION_ATTEMPTS {
        let slug = find_available_slug(&base_slug, move |candidate| async move {
            Organization::slug_exists(pool, &candidate).await
        })
        .await?
        .ok_or(OnboardingError::SlugExhausted)?;

        let mut tx = pool.begin().await?;

        match provision(&mut tx, session.id, &plan, slug.clone()).await {
            Ok(result) => {
                tx.commit().await?;

                info!(
                    session_id = %session.id,
                    organization_id = %result.organization.id,
                    slug = %result.organization.slug,
                    tier = plan.tier.as_str(),
                    "Onboarding completed"
                );

                return Ok(result);
            }
            Err(OnboardingError::Database(e)) if is_slug_conflict(&e) => {
                tx.rollback().await?;
                warn!(
                    session_id = %session.id,
                    slug = %slug,
                    attempt,
                    "Slug claimed concurrently, retrying"
                );
            }
            Err(e) => {
                tx.rollback().await?;
                return Err(e);
            }
        }
    }

    Err(OnboardingError::SlugExhausted)
}

/// Deletes expired sessions that were never completed
///
/// Completed sessions are kept regardless of expiry. Safe to run repeatedly.
pub async fn cleanup_expired_sessions(pool: &PgPool) -> Result<CleanupResult, OnboardingError> {
    let deleted_count = OnboardingSession::delete_expired(pool).await?;

    info!(deleted_count, at = %Utc::now(), "Expired onboarding sessions cleaned up");

    Ok(CleanupResult {
        deleted_count,
        message: format!("Cleaned up {} expired onboarding sessions", deleted_count),
    })
}
