/// JWT access tokens
///
/// Tokens are issued by the identity provider at login and verified here on
/// every request. They are signed with HS256 and carry the user id plus,
/// optionally, the organization the user is currently acting in.
///
/// # Claims
///
/// - `sub`: user ID
/// - `iss`: always `"strive"`
/// - `iat` / `nbf` / `exp`: Unix timestamps
/// - `org`: active organization ID (absent until the user switches org)
/// - `token_type`: access or refresh
///
/// # Example
///
/// ```
/// use strive_shared::auth::jwt::{create_token, validate_access_token, Claims, TokenType};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "a-secret-that-is-at-least-32-bytes!!";
///
/// let token = create_token(&Claims::new(user_id, None, TokenType::Access), secret)?;
/// let claims = validate_access_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ISSUER: &str = "strive";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token issuer")]
    InvalidIssuer,

    #[error("Expected {expected} token")]
    WrongTokenType { expected: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// 24 hours
    Access,

    /// 30 days
    Refresh,
}

impl TokenType {
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,

    /// Active organization, if the user picked one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<Uuid>,

    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims with the token type's default lifetime
    pub fn new(user_id: Uuid, organization_id: Option<Uuid>, token_type: TokenType) -> Self {
        Self::with_expiration(
            user_id,
            organization_id,
            token_type,
            token_type.default_expiration(),
        )
    }

    /// Creates claims valid for `expires_in` from now
    ///
    /// A negative duration yields an already-expired token.
    pub fn with_expiration(
        user_id: Uuid,
        organization_id: Option<Uuid>,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
            org: organization_id,
            token_type,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims with HS256
///
/// The secret should be at least 32 bytes; the API refuses to start with a
/// shorter one.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Verifies signature, issuer, `exp` and `nbf`, and returns the claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_nbf = true;
    validation.leeway = 0;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
            _ => JwtError::ValidationError(e.to_string()),
        })
}

/// Like [`validate_token`], but rejects refresh tokens
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::WrongTokenType {
            expected: TokenType::Access.as_str(),
        });
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-32-bytes-long";

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();

        let token = create_token(&Claims::new(user_id, Some(org_id), TokenType::Access), SECRET)
            .unwrap();
        let claims = validate_access_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.org, Some(org_id));
        assert_eq!(claims.iss, "strive");
    }

    #[test]
    fn test_org_claim_is_optional() {
        let token =
            create_token(&Claims::new(Uuid::new_v4(), None, TokenType::Access), SECRET).unwrap();
        assert!(validate_token(&token, SECRET).unwrap().org.is_none());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token =
            create_token(&Claims::new(Uuid::new_v4(), None, TokenType::Access), SECRET).unwrap();
        let result = validate_token(&token, "another-secret-key-that-is-32-bytes!");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            None,
            TokenType::Access,
            Duration::seconds(-60),
        );
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let token =
            create_token(&Claims::new(Uuid::new_v4(), None, TokenType::Refresh), SECRET).unwrap();
        assert!(matches!(
            validate_access_token(&token, SECRET),
            Err(JwtError::WrongTokenType { expected: "access" })
        ));
    }
}
