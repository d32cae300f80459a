use async_trait::async_trait;
use jsonwebtoken::Algorithm;
use thiserror::Error;

use crate::repos::user_repo::UserProfile;

/// Identity extracted from a token after its signature and claims were checked.
///
/// `subject` is always non-empty. The profile fields are whatever the provider
/// put in the token this time; a missing claim is `None`, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
}

impl VerifiedIdentity {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            picture: self.picture.clone(),
            email: self.email.clone(),
        }
    }
}

/// Why a token was not accepted.
///
/// Callers treat every variant the same way (the request fails); the variants
/// exist so logs say what actually went wrong.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("malformed token: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    #[error("unsupported signing algorithm: {0:?}")]
    UnsupportedAlgorithm(Algorithm),

    #[error("token header has no key id")]
    MissingKeyId,

    #[error("no signing key with id '{0}'")]
    UnknownKey(String),

    #[error("unusable signing key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    #[error("token rejected: {0}")]
    Rejected(#[source] jsonwebtoken::errors::Error),

    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),

    #[error("token issued in the future")]
    IssuedInFuture,

    #[error("token lifetime exceeds {0} seconds")]
    LifetimeTooLong(u64),

    #[error("signing keys unavailable: {0}")]
    CertsUnavailable(String),
}

/// Verifies an opaque identity token for the given audience.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str, audience: &str) -> Result<VerifiedIdentity, VerifyError>;
}
