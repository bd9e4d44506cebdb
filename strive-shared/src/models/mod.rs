/// Database models for the Strive platform core
///
/// Each model owns its SQL. Functions take any `PgExecutor` so they run
/// equally against the pool or inside a `sqlx::Transaction`.
///
/// # Models
///
/// - `user`: platform accounts and platform roles
/// - `organization`: tenants
/// - `membership`: user-organization links with org roles
/// - `subscription`: one billing subscription per organization
/// - `onboarding_session`: staged signup data
/// - `project`, `task`: project-scoped tasks
/// - `lead`: CRM leads
/// - `transaction_loop`: real-estate deals
/// - `activity_log`: append-only audit trail
///
/// # Example
///
/// ```no_run
/// use strive_shared::models::organization::Organization;
/// use strive_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let taken = Organization::slug_exists(&pool, "acme-realty").await?;
/// # Ok(())
/// # }
/// ```

pub mod activity_log;
pub mod lead;
pub mod membership;
pub mod onboarding_session;
pub mod organization;
pub mod project;
pub mod subscription;
pub mod task;
pub mod transaction_loop;
pub mod user;
