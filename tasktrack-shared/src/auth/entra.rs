/// Microsoft Entra ID token verification
///
/// Access tokens are RS256 JWTs signed by Microsoft. Verification checks
/// the signature against the tenant's published JWKS, plus audience
/// (`api://{client_id}`) and issuer. Signing keys are fetched over HTTPS
/// and cached in-process for 24 hours; an unknown `kid` forces a refresh
/// before the token is rejected.
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{AuthError, AuthUser};

const JWKS_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Claims carried by an Entra access token that we care about
#[derive(Debug, Deserialize)]
struct EntraClaims {
    sub: String,

    #[serde(default)]
    oid: Option<String>,

    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    preferred_username: Option<String>,

    #[serde(default)]
    email: Option<String>,
}

struct CachedKeys {
    set: JwkSet,
    fetched_at: Instant,
}

/// Verifier for Entra-issued access tokens
pub struct EntraVerifier {
    audience: String,
    issuer: String,
    jwks_uri: String,
    http: reqwest::Client,
    keys: RwLock<Option<CachedKeys>>,
}

impl EntraVerifier {
    pub fn new(tenant_id: &str, client_id: &str) -> Self {
        Self {
            audience: format!("api://{client_id}"),
            issuer: format!("https://login.microsoftonline.com/{tenant_id}/v2.0"),
            jwks_uri: format!(
                "https://login.microsoftonline.com/{tenant_id}/discovery/v2.0/keys"
            ),
            http: reqwest::Client::new(),
            keys: RwLock::new(None),
        }
    }

    /// Validates a token and extracts the caller's identity.
    pub async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let header =
            decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("token has no key id".to_string()))?;

        let key = self.signing_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<EntraClaims>(token, &key, &validation).map_err(|e| {
            tracing::warn!(error = %e, "Token validation failed");
            AuthError::InvalidToken(e.to_string())
        })?;

        Ok(extract_user(data.claims))
    }

    async fn signing_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.cached_key(kid).await {
            return Ok(key);
        }

        self.refresh_keys().await?;

        self.cached_key(kid).await.ok_or_else(|| {
            AuthError::InvalidToken(format!("no signing key published for kid {kid}"))
        })
    }

    async fn cached_key(&self, kid: &str) -> Option<DecodingKey> {
        let guard = self.keys.read().await;
        let cached = guard.as_ref()?;

        if cached.fetched_at.elapsed() > JWKS_CACHE_TTL {
            return None;
        }

        let jwk = cached.set.find(kid)?;
        DecodingKey::from_jwk(jwk).ok()
    }

    async fn refresh_keys(&self) -> Result<(), AuthError> {
        let set: JwkSet = self
            .http
            .get(&self.jwks_uri)
            .send()
            .await
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?;

        tracing::debug!(keys = set.keys.len(), "Refreshed Entra signing keys");

        *self.keys.write().await = Some(CachedKeys {
            set,
            fetched_at: Instant::now(),
        });

        Ok(())
    }
}

fn extract_user(claims: EntraClaims) -> AuthUser {
    let EntraClaims {
        sub,
        oid,
        name,
        preferred_username,
        email,
    } = claims;

    AuthUser {
        user_id: oid.unwrap_or(sub),
        name: name
            .or_else(|| preferred_username.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        email: preferred_username.or(email).unwrap_or_default(),
    }
}
