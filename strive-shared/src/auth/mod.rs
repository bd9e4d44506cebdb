/// Authentication and authorization
///
/// # Modules
///
/// - [`jwt`]: HS256 access token validation
/// - [`middleware`]: bearer-token extraction into [`middleware::AuthContext`]
/// - [`identity`]: loads the current user and its active-org memberships
/// - [`rbac`]: pure loop-permission resolver
/// - [`authorization`]: membership and role checks against the database
/// - [`session_token`]: opaque onboarding session tokens
///
/// Passwords and login are handled by the external identity provider; this
/// crate only verifies the tokens it issues.
///
/// # Example
///
/// ```
/// use strive_shared::auth::jwt::{create_token, validate_access_token, Claims, TokenType};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-that-is-at-least-32-bytes!!";
/// let token = create_token(&Claims::new(Uuid::new_v4(), None, TokenType::Access), secret)?;
/// validate_access_token(&token, secret)?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod rbac;
pub mod session_token;
