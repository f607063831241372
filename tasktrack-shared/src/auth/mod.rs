/// Bearer-token authentication
///
/// Authentication is delegated entirely to a third-party identity provider;
/// this service never issues credentials of its own. Exactly one provider
/// is active per deployment:
///
/// - **Entra**: validates RS256 JWTs against Microsoft's published JWKS
/// - **Google**: resolves the bearer token through the userinfo endpoint
/// - **Local dev**: no provider configured; every request gets a fixed
///   development identity and no header is required
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::{AuthUser, TokenVerifier};
///
/// # async fn example() {
/// let verifier = TokenVerifier::LocalDev;
/// let user = verifier.authenticate(None).await.unwrap();
/// assert_eq!(user.user_id, "local-dev");
/// # }
/// ```
use serde::{Deserialize, Serialize};

pub mod entra;
pub mod google;

pub use entra::EntraVerifier;
pub use google::GoogleVerifier;

/// Identity extracted from a validated credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Stable provider subject; used for ownership scoping
    pub user_id: String,

    /// Display name
    pub name: String,

    /// Email address, may be empty
    pub email: String,
}

impl AuthUser {
    /// The fixed identity used when no provider is configured.
    pub fn local_dev() -> Self {
        Self {
            user_id: "local-dev".to_string(),
            name: "Local Developer".to_string(),
            email: "dev@local".to_string(),
        }
    }
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header on the request
    #[error("missing bearer token")]
    MissingCredentials,

    /// The Authorization header is not a Bearer credential
    #[error("invalid authorization header: {0}")]
    InvalidFormat(String),

    /// The provider rejected the token
    #[error("token rejected: {0}")]
    InvalidToken(String),

    /// The provider could not be reached
    #[error("identity provider unreachable: {0}")]
    ProviderUnavailable(String),
}

/// The configured identity provider
pub enum TokenVerifier {
    /// Microsoft Entra ID (JWKS + RS256 JWT validation)
    Entra(EntraVerifier),

    /// Google OAuth (userinfo endpoint)
    Google(GoogleVerifier),

    /// No provider; fixed development identity
    LocalDev,
}

impl TokenVerifier {
    /// Resolves the caller's identity from an `Authorization` header value.
    ///
    /// With a provider configured, a missing or malformed header and any
    /// provider rejection all fail; in local-dev mode the header is ignored
    /// entirely.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<AuthUser, AuthError> {
        match self {
            TokenVerifier::LocalDev => Ok(AuthUser::local_dev()),
            TokenVerifier::Entra(verifier) => verifier.verify(bearer_token(authorization)?).await,
            TokenVerifier::Google(verifier) => verifier.verify(bearer_token(authorization)?).await,
        }
    }
}

fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    let header = authorization.ok_or(AuthError::MissingCredentials)?;
    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_dev_ignores_header() {
        let verifier = TokenVerifier::LocalDev;

        let user = verifier.authenticate(None).await.unwrap();
        assert_eq!(user, AuthUser::local_dev());

        let user = verifier.authenticate(Some("Bearer junk")).await.unwrap();
        assert_eq!(user.user_id, "local-dev");
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(Some("Bearer abc")).unwrap(), "abc");
        assert!(matches!(
            bearer_token(None),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            bearer_token(Some("Basic abc")),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_entra_requires_header() {
        let verifier = TokenVerifier::Entra(EntraVerifier::new("tenant", "client"));

        let result = verifier.authenticate(None).await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }
}
