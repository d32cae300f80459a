//! Provider signing keys (JWKS).
//!
//! The verifier only needs "give me the current key set"; fetching over HTTP is
//! one implementation, tests plug in a static one.
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use reqwest::header::{CACHE_CONTROL, HeaderMap};
use url::Url;

use crate::services::identity::VerifyError;

/// A key set plus how long the provider says it may be reused.
#[derive(Debug, Clone)]
pub struct FetchedCerts {
    pub keys: JwkSet,
    pub max_age: Option<Duration>,
}

#[async_trait]
pub trait CertsSource: Send + Sync {
    async fn fetch(&self) -> Result<FetchedCerts, VerifyError>;
}

/// Fetches the JWKS document from the provider's certs endpoint.
#[derive(Clone, Debug)]
pub struct HttpCertsSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpCertsSource {
    pub fn new(url: Url) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl CertsSource for HttpCertsSource {
    async fn fetch(&self) -> Result<FetchedCerts, VerifyError> {
        let res = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| VerifyError::CertsUnavailable(e.to_string()))?;

        let max_age = max_age(res.headers());

        let keys = res
            .json::<JwkSet>()
            .await
            .map_err(|e| VerifyError::CertsUnavailable(format!("malformed key set: {e}")))?;

        tracing::debug!(url = %self.url, keys = keys.keys.len(), ?max_age, "fetched signing keys");

        Ok(FetchedCerts { keys, max_age })
    }
}

// `Cache-Control: public, max-age=19204, must-revalidate, no-transform`
pub(crate) fn max_age(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(CACHE_CONTROL)?
        .to_str()
        .ok()?
        .split(',')
        .find_map(|directive| {
            directive
                .trim()
                .strip_prefix("max-age=")?
                .parse::<u64>()
                .ok()
        })
        .map(Duration::from_secs)
}
