//! Identity-provider signing-key cache.
//!
//! Holds the provider's published JWK set in memory behind a TTL. A miss
//! or an expired entry triggers a fetch of the full set; a failed fetch
//! fails the calling verification rather than silently serving a stale
//! set. Lookup by `kid` treats absence as a normal outcome: an unknown
//! key means the token cannot be trusted, not that the cache is broken.

use std::time::{Duration, Instant};

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;
use reqwest::StatusCode;
use tokio::sync::RwLock;
use url::Url;

/// Default TTL for the cached key set. Providers rotate keys rarely;
/// the original deployment cached for 10 000 seconds.
pub const DEFAULT_JWKS_TTL: Duration = Duration::from_secs(10_000);

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("failed to fetch JWKS: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("JWKS endpoint answered with status {0}")]
    HttpStatus(StatusCode),

    #[error("key {kid} cannot be used for verification: {reason}")]
    InvalidKey { kid: String, reason: String },
}

struct CachedKeys {
    keys: JwkSet,
    expires_at: Instant,
}

/// Single-entry TTL cache over one JWKS endpoint.
///
/// Concurrent readers share the cached set; racing refreshes are
/// tolerated as idempotent overwrites, so no fetch deduplication is
/// needed.
pub struct JwksCache {
    http: reqwest::Client,
    jwks_uri: Url,
    ttl: Duration,
    cached: RwLock<Option<CachedKeys>>,
}

impl JwksCache {
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (static configuration,
    /// should not happen in practice).
    pub fn new(jwks_uri: Url, ttl: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client with static configuration");
        Self {
            http,
            jwks_uri,
            ttl,
            cached: RwLock::new(None),
        }
    }

    /// Resolves a decoding key by key id.
    ///
    /// Returns `Ok(None)` when the (freshly fetched, if needed) set has
    /// no key with this id.
    pub async fn get_signing_key(&self, kid: &str) -> Result<Option<DecodingKey>, JwksError> {
        self.ensure_fresh().await?;

        let cached = self.cached.read().await;
        let Some(cached) = cached.as_ref() else {
            // Unreachable after a successful ensure_fresh, but a racing
            // expiry is answered the same way as an unknown key.
            return Ok(None);
        };

        match cached
            .keys
            .keys
            .iter()
            .find(|key| key.common.key_id.as_deref() == Some(kid))
        {
            Some(jwk) => {
                let key = DecodingKey::from_jwk(jwk).map_err(|e| JwksError::InvalidKey {
                    kid: kid.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Some(key))
            }
            None => {
                tracing::warn!("no signing key with kid {} in JWKS", kid);
                Ok(None)
            }
        }
    }

    /// Fetches the key set once so the first request does not pay for
    /// the round trip. Called at startup; failure is reported to the
    /// caller, who may choose to continue and retry lazily.
    pub async fn warm(&self) -> Result<(), JwksError> {
        self.refresh().await
    }

    async fn ensure_fresh(&self) -> Result<(), JwksError> {
        {
            let cached = self.cached.read().await;
            if let Some(cached) = cached.as_ref() {
                if Instant::now() < cached.expires_at {
                    return Ok(());
                }
            }
        }
        self.refresh().await
    }

    async fn refresh(&self) -> Result<(), JwksError> {
        tracing::debug!("fetching JWKS from {}", self.jwks_uri);

        let response = self
            .http
            .get(self.jwks_uri.as_str())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(JwksError::HttpStatus(status));
        }

        let keys: JwkSet = response.json().await?;
        tracing::debug!("cached JWKS with {} keys", keys.keys.len());

        let mut cached = self.cached.write().await;
        *cached = Some(CachedKeys {
            keys,
            expires_at: Instant::now() + self.ttl,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn empty_jwks() -> serde_json::Value {
        serde_json::json!({ "keys": [] })
    }

    #[tokio::test]
    async fn unknown_kid_is_none_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_jwks()))
            .mount(&server)
            .await;

        let uri = Url::parse(&format!("{}/jwks", server.uri())).unwrap();
        let cache = JwksCache::new(uri, DEFAULT_JWKS_TTL);
        assert!(cache.get_signing_key("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fetch_failure_is_an_error_not_a_stale_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let uri = Url::parse(&format!("{}/jwks", server.uri())).unwrap();
        let cache = JwksCache::new(uri, DEFAULT_JWKS_TTL);
        let err = cache.get_signing_key("any").await.unwrap_err();
        assert!(matches!(err, JwksError::HttpStatus(s) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn second_lookup_within_ttl_hits_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_jwks()))
            .expect(1)
            .mount(&server)
            .await;

        let uri = Url::parse(&format!("{}/jwks", server.uri())).unwrap();
        let cache = JwksCache::new(uri, DEFAULT_JWKS_TTL);
        let _ = cache.get_signing_key("a").await.unwrap();
        let _ = cache.get_signing_key("b").await.unwrap();
    }

    #[tokio::test]
    async fn expired_entry_is_refetched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_jwks()))
            .expect(2)
            .mount(&server)
            .await;

        let uri = Url::parse(&format!("{}/jwks", server.uri())).unwrap();
        let cache = JwksCache::new(uri, Duration::from_millis(10));
        let _ = cache.get_signing_key("a").await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        let _ = cache.get_signing_key("a").await.unwrap();
    }
}
