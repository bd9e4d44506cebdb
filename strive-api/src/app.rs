/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use strive_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = strive_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use strive_shared::audit::{AuditSink, PgAuditSink};
use strive_shared::auth::middleware::authenticate;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Activity log destination
    pub audit: Arc<dyn AuditSink>,
}

impl AppState {
    /// Creates state that records audit entries in the database
    pub fn new(db: PgPool, config: Config) -> Self {
        let audit = Arc::new(PgAuditSink::new(db.clone()));
        Self::with_audit(db, config, audit)
    }

    /// Creates state with a custom audit sink
    pub fn with_audit(db: PgPool, config: Config, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            audit,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                                   # Health check (public)
/// └── /v1/
///     ├── /webhooks/payments                    # Payment provider (signature)
///     ├── /onboarding/sessions                  # JWT
///     │   ├── POST   /
///     │   ├── GET    /:token
///     │   ├── PUT    /:token/steps/:step
///     │   └── POST   /:token/complete
///     ├── /tasks/bulk/{status,assign,priority,delete}
///     ├── /leads/bulk/{status,assign,delete}
///     ├── /loops                                # GET, POST
///     │   └── /:id                              # PATCH, DELETE
///     ├── /members                              # GET
///     │   └── /:user_id                         # DELETE
///     └── /admin/onboarding/cleanup             # POST, platform admin
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Authentication (every `/v1` group except webhooks)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Authenticated by request signature, not JWT
    let webhook_routes =
        Router::new().route("/payments", post(routes::webhooks::payment_webhook));

    let onboarding_routes = Router::new()
        .route("/sessions", post(routes::onboarding::create_session))
        .route("/sessions/:token", get(routes::onboarding::get_session))
        .route(
            "/sessions/:token/steps/:step",
            put(routes::onboarding::update_step),
        )
        .route(
            "/sessions/:token/complete",
            post(routes::onboarding::complete),
        );

    let task_routes = Router::new()
        .route("/bulk/status", post(routes::tasks::bulk_status))
        .route("/bulk/assign", post(routes::tasks::bulk_assign))
        .route("/bulk/priority", post(routes::tasks::bulk_priority))
        .route("/bulk/delete", post(routes::tasks::bulk_delete));

    let lead_routes = Router::new()
        .route("/bulk/status", post(routes::leads::bulk_status))
        .route("/bulk/assign", post(routes::leads::bulk_assign))
        .route("/bulk/delete", post(routes::leads::bulk_delete));

    let loop_routes = Router::new()
        .route(
            "/",
            get(routes::loops::list_loops).post(routes::loops::create_loop),
        )
        .route(
            "/:id",
            patch(routes::loops::update_loop).delete(routes::loops::delete_loop),
        );

    let member_routes = Router::new()
        .route("/", get(routes::members::list_members))
        .route("/:user_id", delete(routes::members::remove_member));

    let admin_routes = Router::new().route(
        "/onboarding/cleanup",
        post(routes::admin::cleanup_onboarding_sessions),
    );

    let authenticated = Router::new()
        .nest("/onboarding", onboarding_routes)
        .nest("/tasks", task_routes)
        .nest("/leads", lead_routes)
        .nest("/loops", loop_routes)
        .nest("/members", member_routes)
        .nest("/admin", admin_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/webhooks", webhook_routes)
        .merge(authenticated);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// CORS policy for the configured origins
///
/// `*` yields a permissive policy for development.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("stripe-signature"),
        ])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// JWT authentication middleware layer
///
/// Validates the bearer token and injects `AuthContext` into request
/// extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret())?;
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
