/// Google OAuth token verification
///
/// Google access tokens are opaque, so verification is a single call to the
/// userinfo endpoint with the bearer token; a non-success status means the
/// token is invalid or expired. No response caching: tokens are checked on
/// every request, matching the provider's own expiry semantics.
use serde::Deserialize;

use super::{AuthError, AuthUser};

const USERINFO_URI: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,

    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    email: Option<String>,
}

/// Verifier for Google-issued access tokens
pub struct GoogleVerifier {
    http: reqwest::Client,
}

impl GoogleVerifier {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Resolves a bearer token to the caller's identity.
    pub async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .http
            .get(USERINFO_URI)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Userinfo rejected token");
            return Err(AuthError::InvalidToken(format!(
                "userinfo returned {}",
                response.status()
            )));
        }

        let info: UserInfo = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(AuthUser {
            user_id: info.sub,
            name: info.name.unwrap_or_else(|| "Unknown".to_string()),
            email: info.email.unwrap_or_default(),
        })
    }
}

impl Default for GoogleVerifier {
    fn default() -> Self {
        Self::new()
    }
}
