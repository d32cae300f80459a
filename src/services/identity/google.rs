//! Google ID token verification.
//!
//! Mirrors what Google's client libraries check for a Sign-In credential:
//! RS256 signature against the published certs, issuer, audience, expiry,
//! and a sane `iat`/`exp` window.
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::services::identity::{CertsSource, IdentityVerifier, VerifiedIdentity, VerifyError};

const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

// Google refuses tokens whose validity window is longer than a day.
const MAX_TOKEN_LIFETIME_SECS: u64 = 86_400;

// Upper bound on how long a fetched key set is trusted, whatever `max-age` says.
const MAX_CERTS_CACHE: Duration = Duration::from_secs(86_400);

// An unknown `kid` forces a refetch at most this often.
const FORCED_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    exp: u64,
    #[serde(default)]
    iat: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl From<IdTokenClaims> for VerifiedIdentity {
    fn from(c: IdTokenClaims) -> Self {
        Self {
            subject: c.sub,
            name: c.name,
            picture: c.picture,
            email: c.email,
        }
    }
}

struct CachedCerts {
    keys: Arc<JwkSet>,
    fetched_at: Instant,
    expires_at: Instant,
}

pub struct GoogleIdTokenVerifier {
    certs: Arc<dyn CertsSource>,
    leeway: Duration,
    forced_refresh_interval: Duration,
    cache: RwLock<Option<CachedCerts>>,
}

impl std::fmt::Debug for GoogleIdTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleIdTokenVerifier")
            .field("leeway", &self.leeway)
            .finish()
    }
}

impl GoogleIdTokenVerifier {
    pub fn new(certs: Arc<dyn CertsSource>, leeway: Duration) -> Self {
        Self {
            certs,
            leeway,
            forced_refresh_interval: FORCED_REFRESH_INTERVAL,
            cache: RwLock::new(None),
        }
    }

    #[cfg(test)]
    fn with_forced_refresh_interval(mut self, interval: Duration) -> Self {
        self.forced_refresh_interval = interval;
        self
    }

    // Cached key set while `max-age` holds, otherwise a fresh fetch.
    // The bool tells whether the keys came from the cache.
    async fn signing_keys(&self) -> Result<(Arc<JwkSet>, bool), VerifyError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref()
                && cached.expires_at > Instant::now()
            {
                return Ok((Arc::clone(&cached.keys), true));
            }
        }

        Ok((self.refresh_keys().await?, false))
    }

    async fn refresh_keys(&self) -> Result<Arc<JwkSet>, VerifyError> {
        let fetched = self.certs.fetch().await?;
        let keys = Arc::new(fetched.keys);
        let now = Instant::now();

        let expires_at = fetched
            .max_age
            .filter(|max_age| !max_age.is_zero())
            .and_then(|max_age| now.checked_add(max_age.min(MAX_CERTS_CACHE)));

        let mut cache = self.cache.write().await;
        *cache = expires_at.map(|expires_at| CachedCerts {
            keys: Arc::clone(&keys),
            fetched_at: now,
            expires_at,
        });

        Ok(keys)
    }

    // A cached set that misses `kid` is refetched once, unless it is very fresh.
    async fn key_for(&self, kid: &str) -> Result<Arc<JwkSet>, VerifyError> {
        let (keys, cached) = self.signing_keys().await?;
        if keys.find(kid).is_some() || !cached {
            return Ok(keys);
        }

        let stale_enough = self
            .cache
            .read()
            .await
            .as_ref()
            .is_none_or(|c| c.fetched_at.elapsed() >= self.forced_refresh_interval);
        if !stale_enough {
            return Ok(keys);
        }

        tracing::info!(kid, "unknown signing key, refetching certs");
        self.refresh_keys().await
    }

    fn validation(&self, audience: &str) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = self.leeway.as_secs();
        validation
    }

    fn check_issued_at(&self, claims: &IdTokenClaims) -> Result<(), VerifyError> {
        let Some(iat) = claims.iat else {
            return Ok(());
        };

        if iat > unix_now() + self.leeway.as_secs() {
            return Err(VerifyError::IssuedInFuture);
        }
        if claims.exp.saturating_sub(iat) > MAX_TOKEN_LIFETIME_SECS {
            return Err(VerifyError::LifetimeTooLong(MAX_TOKEN_LIFETIME_SECS));
        }

        Ok(())
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdTokenVerifier {
    async fn verify(&self, token: &str, audience: &str) -> Result<VerifiedIdentity, VerifyError> {
        let header = decode_header(token).map_err(VerifyError::Malformed)?;
        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::UnsupportedAlgorithm(header.alg));
        }
        let kid = header.kid.ok_or(VerifyError::MissingKeyId)?;

        let keys = self.key_for(&kid).await?;
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| VerifyError::UnknownKey(kid.clone()))?;
        let key = DecodingKey::from_jwk(jwk).map_err(VerifyError::InvalidKey)?;

        let claims = decode::<IdTokenClaims>(token, &key, &self.validation(audience))
            .map_err(VerifyError::Rejected)?
            .claims;

        self.check_issued_at(&claims)?;
        if claims.sub.trim().is_empty() {
            return Err(VerifyError::EmptyClaim("sub"));
        }

        Ok(claims.into())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
