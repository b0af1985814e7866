use crate::config::FirebaseCredentials;
use crate::error::{AuthError, Error, Result};
use crate::models::user::Claims;
use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header, errors::ErrorKind, jwk::JwkSet, Algorithm, DecodingKey, EncodingKey,
    Validation,
};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const KEY_CACHE_TTL: Duration = Duration::from_secs(60 * 60);
/// Unknown key ids only trigger a refetch once this much time has passed.
const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> std::result::Result<Claims, AuthError>;
}

struct CachedKeys {
    fetched_at: Instant,
    set: JwkSet,
}

/// Verifies Firebase ID tokens against Google's published signing keys.
pub struct FirebaseVerifier {
    client: Client,
    jwks_url: String,
    project_id: String,
    issuer: String,
    keys: RwLock<Option<CachedKeys>>,
}

impl FirebaseVerifier {
    /// Fails when the service-account key is unusable, mirroring a failed
    /// SDK initialization.
    pub fn new(credentials: &FirebaseCredentials, jwks_url: String, client: Client) -> Result<Self> {
        EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
            .map_err(|e| Error::Config(format!("Invalid Firebase private key: {}", e)))?;

        tracing::info!(
            project_id = %credentials.project_id,
            client_email = %credentials.client_email,
            "Firebase identity verification enabled"
        );

        Ok(Self {
            client,
            jwks_url,
            project_id: credentials.project_id.clone(),
            issuer: format!("https://securetoken.google.com/{}", credentials.project_id),
            keys: RwLock::new(None),
        })
    }

    async fn fetch_keys(&self) -> std::result::Result<JwkSet, AuthError> {
        let res = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::AuthenticationFailure(format!("Failed to fetch signing keys: {}", e)))?;

        if !res.status().is_success() {
            return Err(AuthError::AuthenticationFailure(format!(
                "Signing key endpoint returned {}",
                res.status()
            )));
        }

        res.json::<JwkSet>()
            .await
            .map_err(|e| AuthError::AuthenticationFailure(format!("Invalid signing key set: {}", e)))
    }

    /// Looks `kid` up in the cached key set, refetching when the cache is
    /// stale or does not know the key yet. Refetches for unknown ids are
    /// spaced at least `MIN_REFETCH_INTERVAL` apart.
    async fn decoding_key(&self, kid: &str) -> std::result::Result<DecodingKey, AuthError> {
        {
            let guard = self.keys.read().await;
            if let Some(cached) = guard.as_ref() {
                let age = cached.fetched_at.elapsed();
                if age < KEY_CACHE_TTL {
                    if let Some(jwk) = cached.set.find(kid) {
                        return DecodingKey::from_jwk(jwk).map_err(|_| AuthError::InvalidCredential);
                    }
                    if age < MIN_REFETCH_INTERVAL {
                        tracing::debug!(kid = %kid, "Unknown key id, refetch suppressed");
                        return Err(AuthError::InvalidCredential);
                    }
                }
            }
        }

        tracing::debug!(kid = %kid, "Refreshing Firebase signing keys");
        let set = self.fetch_keys().await?;
        let key = set.find(kid).map(DecodingKey::from_jwk);
        *self.keys.write().await = Some(CachedKeys {
            fetched_at: Instant::now(),
            set,
        });

        match key {
            Some(Ok(key)) => Ok(key),
            Some(Err(_)) | None => Err(AuthError::InvalidCredential),
        }
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> std::result::Result<Claims, AuthError> {
        let header = decode_header(token).map_err(classify)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidCredential);
        }
        let kid = header.kid.ok_or(AuthError::InvalidCredential)?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let data = decode::<Claims>(token, &key, &validation).map_err(classify)?;
        if data.claims.sub.is_empty() {
            return Err(AuthError::InvalidCredential);
        }
        Ok(data.claims)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredCredential,
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => AuthError::InvalidCredential,
        _ => AuthError::AuthenticationFailure(err.to_string()),
    }
}
