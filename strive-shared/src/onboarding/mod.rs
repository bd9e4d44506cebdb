/// Onboarding workflow
///
/// A new user walks through four steps staged in an
/// [`OnboardingSession`](crate::models::onboarding_session::OnboardingSession):
///
/// 1. Organization details
/// 2. Plan (tier and billing cycle)
/// 3. Payment, confirmed asynchronously by the payment provider's webhook
/// 4. Completion, which provisions the organization
///
/// # Modules
///
/// - [`session`]: create, read and advance sessions
/// - [`payment`]: webhook signature verification and payment recording
/// - [`slug`]: slug derivation and collision probing
/// - [`completion`]: the provisioning transaction and expired-session cleanup

pub mod completion;
pub mod payment;
pub mod session;
pub mod slug;

pub use completion::{cleanup_expired_sessions, complete_onboarding, CleanupResult, CompletionResult};
pub use session::{create_session, get_session, update_step, StepData};

/// Error type for the onboarding workflow
///
/// `Display` strings are user-facing and matched on by clients.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Onboarding session has expired")]
    SessionExpired,

    #[error("Onboarding session already completed")]
    AlreadyCompleted,

    #[error("Organization name is required")]
    OrganizationNameRequired,

    #[error("Subscription tier is required")]
    TierRequired,

    #[error("Payment required to complete onboarding")]
    PaymentRequired,

    #[error("Could not generate unique slug")]
    SlugExhausted,

    #[error("Invalid onboarding step: {0}")]
    InvalidStep(i32),

    #[error("Invalid step data: {0}")]
    InvalidStepData(String),

    #[error("Step data failed validation")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
