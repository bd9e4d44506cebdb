/// Onboarding session lifecycle
///
/// Sessions are created at step 1 with a random token and a fixed lifetime.
/// Each step stores its data and moves `current_step` forward; steps may be
/// revisited while the session is open.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::OnboardingError;
use crate::auth::session_token::{generate_session_token, is_valid_session_token_format};
use crate::models::onboarding_session::{CreateOnboardingSession, OnboardingSession};
use crate::models::subscription::{BillingCycle, SubscriptionTier};

/// Default session lifetime
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Step 1 payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrgDetailsStep {
    #[validate(length(min = 1, max = 100, message = "Organization name must be 1-100 characters"))]
    pub org_name: String,

    #[validate(url(message = "Website must be a valid URL"))]
    pub org_website: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub org_description: Option<String>,
}

/// Step 2 payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStep {
    pub selected_tier: SubscriptionTier,

    #[serde(default)]
    pub billing_cycle: BillingCycle,
}

/// Data submitted for one step
#[derive(Debug, Clone)]
pub enum StepData {
    OrgDetails(OrgDetailsStep),
    Plan(PlanStep),
}

impl StepData {
    /// Parses the JSON body submitted for `step`
    ///
    /// Only steps 1 and 2 accept client data. Payment is recorded by the
    /// provider webhook and the final step is
    /// [`complete_onboarding`](super::complete_onboarding).
    pub fn from_json(step: i32, body: JsonValue) -> Result<Self, OnboardingError> {
        let parse_error = |e: serde_json::Error| OnboardingError::InvalidStepData(e.to_string());

        match step {
            1 => {
                let mut details: OrgDetailsStep =
                    serde_json::from_value(body).map_err(parse_error)?;
                details.org_name = details.org_name.trim().to_string();
                details.org_website = details.org_website.filter(|w| !w.trim().is_empty());
                details.org_description =
                    details.org_description.filter(|d| !d.trim().is_empty());
                details.validate()?;
                Ok(StepData::OrgDetails(details))
            }
            2 => Ok(StepData::Plan(
                serde_json::from_value(body).map_err(parse_error)?,
            )),
            other => Err(OnboardingError::InvalidStep(other)),
        }
    }

    fn step_number(&self) -> i32 {
        match self {
            StepData::OrgDetails(_) => 1,
            StepData::Plan(_) => 2,
        }
    }
}

/// Starts a new session for `user_id`
pub async fn create_session(
    pool: &PgPool,
    user_id: Uuid,
    ttl: Duration,
) -> Result<OnboardingSession, OnboardingError> {
    let session = OnboardingSession::create(
        pool,
        CreateOnboardingSession {
            session_token: generate_session_token(),
            user_id,
            expires_at: Utc::now() + ttl,
        },
    )
    .await?;

    info!(
        session_id = %session.id,
        user_id = %user_id,
        expires_at = %session.expires_at,
        "Onboarding session created"
    );

    Ok(session)
}

/// Looks up a session by token
pub async fn get_session(
    pool: &PgPool,
    session_token: &str,
) -> Result<OnboardingSession, OnboardingError> {
    if !is_valid_session_token_format(session_token) {
        return Err(OnboardingError::SessionNotFound);
    }

    OnboardingSession::find_by_token(pool, session_token)
        .await?
        .ok_or(OnboardingError::SessionNotFound)
}

/// Rejects sessions that can no longer be edited
pub(crate) fn ensure_open(session: &OnboardingSession) -> Result<(), OnboardingError> {
    if session.is_completed {
        return Err(OnboardingError::AlreadyCompleted);
    }
    if session.is_expired_at(Utc::now()) {
        return Err(OnboardingError::SessionExpired);
    }

    Ok(())
}

/// Stores the data for one step and advances the session
pub async fn update_step(
    pool: &PgPool,
    session_token: &str,
    data: StepData,
) -> Result<OnboardingSession, OnboardingError> {
    let session = get_session(pool, session_token).await?;
    ensure_open(&session)?;

    let next_step = data.step_number() + 1;
    let updated = match data {
        StepData::OrgDetails(details) => {
            OnboardingSession::update_org_details(
                pool,
                session.id,
                &details.org_name,
                details.org_website.as_deref(),
                details.org_description.as_deref(),
                next_step,
            )
            .await?
        }
        StepData::Plan(plan) => {
            OnboardingSession::update_plan(
                pool,
                session.id,
                plan.selected_tier,
                plan.billing_cycle,
                next_step,
            )
            .await?
        }
    };

    debug!(
        session_id = %updated.id,
        current_step = updated.current_step,
        "Onboarding step saved"
    );

    Ok(updated)
}
