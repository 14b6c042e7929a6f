//! Identity provider signing keys (JWKS) with caching

use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use moka::future::Cache;
use reqwest::header::{HeaderMap, CACHE_CONTROL};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{AuthConfig, KeyFetchError};

const JWKS_CACHE_KEY: &str = "jwks";

/// Longest a key set is ever kept, whatever the configuration asks for
pub const MAX_JWKS_CACHE_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Source of identity provider verification keys
#[async_trait]
pub trait KeyFetcher: Send + Sync {
    /// Resolve the key the provider currently publishes under `kid`
    async fn get_public_key(&self, kid: &str) -> Result<Arc<DecodingKey>, KeyFetchError>;
}

/// JWKS (JSON Web Key Set) structure
#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

/// Individual JWK (JSON Web Key)
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kid: String,
    pub kty: String,
    pub alg: Option<String>,
    #[serde(default)]
    pub n: Option<String>,
    #[serde(default)]
    pub e: Option<String>,
}

/// Parsed key set plus the moment the provider said it stops being fresh
struct KeySet {
    keys: HashMap<String, Arc<DecodingKey>>,
    fresh_until: Instant,
}

impl KeySet {
    fn from_jwks(jwks: &Jwks, lifetime: Duration) -> Result<Self, KeyFetchError> {
        let mut keys = HashMap::with_capacity(jwks.keys.len());
        for jwk in &jwks.keys {
            if jwk.kty != "RSA" {
                tracing::debug!(kid = %jwk.kid, kty = %jwk.kty, "Skipping non-RSA key");
                continue;
            }
            let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
                tracing::warn!(kid = %jwk.kid, "RSA key missing modulus or exponent");
                continue;
            };
            match DecodingKey::from_rsa_components(n, e) {
                Ok(key) => {
                    keys.insert(jwk.kid.clone(), Arc::new(key));
                }
                Err(err) => tracing::warn!(kid = %jwk.kid, error = %err, "Unusable RSA key"),
            }
        }

        if keys.is_empty() {
            return Err(KeyFetchError::InvalidKeySet(
                "no usable RSA keys in key set".to_string(),
            ));
        }

        Ok(Self {
            keys,
            fresh_until: Instant::now() + lifetime,
        })
    }

    fn is_stale(&self) -> bool {
        Instant::now() >= self.fresh_until
    }
}

/// Key fetcher backed by the provider's published JWKS endpoint
///
/// - Caches the whole key set, so one fetch serves every key id
/// - Rejects unknown key IDs against a fresh set without refetching
/// - Never keeps a set longer than the provider's `Cache-Control: max-age`,
///   so retired keys stop verifying once the provider drops them
#[derive(Clone)]
pub struct JwksKeyFetcher {
    jwks_url: String,
    max_cache_duration: Duration,
    http_client: reqwest::Client,
    cache: Cache<&'static str, Arc<KeySet>>,
}

impl JwksKeyFetcher {
    /// Create a key fetcher with an HTTP client tuned for JWKS fetching
    pub fn new(config: &AuthConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(2)
            .tcp_nodelay(true)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self::with_client(config, http_client)
    }

    /// Create a key fetcher with a caller-supplied HTTP client
    pub fn with_client(config: &AuthConfig, http_client: reqwest::Client) -> Self {
        let max_cache_duration = config.jwks_cache_duration.min(MAX_JWKS_CACHE_DURATION);
        if max_cache_duration < config.jwks_cache_duration {
            tracing::warn!(
                configured_secs = config.jwks_cache_duration.as_secs(),
                capped_secs = max_cache_duration.as_secs(),
                "JWKS cache duration capped"
            );
        }

        Self {
            jwks_url: config.jwks_url.clone(),
            max_cache_duration,
            http_client,
            cache: Cache::builder()
                .time_to_live(max_cache_duration)
                .max_capacity(1)
                .build(),
        }
    }

    /// Drop the cached key set, forcing a fetch on the next lookup
    pub async fn invalidate_cache(&self) {
        self.cache.invalidate(&JWKS_CACHE_KEY).await;
    }

    async fn current_key_set(&self) -> Result<Arc<KeySet>, KeyFetchError> {
        if let Some(set) = self.cache.get(&JWKS_CACHE_KEY).await {
            if !set.is_stale() {
                return Ok(set);
            }
            tracing::debug!("Cached key set past provider max-age, refetching");
            self.cache.invalidate(&JWKS_CACHE_KEY).await;
        }

        // Concurrent misses share a single in-flight fetch
        self.cache
            .try_get_with(JWKS_CACHE_KEY, self.fetch_key_set())
            .await
            .map_err(|e| (*e).clone())
    }

    async fn fetch_key_set(&self) -> Result<Arc<KeySet>, KeyFetchError> {
        tracing::debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| KeyFetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyFetchError::Transport(format!(
                "JWKS endpoint returned {status}"
            )));
        }

        let lifetime = cache_max_age(response.headers())
            .map_or(self.max_cache_duration, |age| age.min(self.max_cache_duration));

        let jwks = response
            .json::<Jwks>()
            .await
            .map_err(|e| KeyFetchError::InvalidKeySet(e.to_string()))?;

        let set = KeySet::from_jwks(&jwks, lifetime)?;
        tracing::debug!(
            keys = set.keys.len(),
            lifetime_secs = lifetime.as_secs(),
            "JWKS cached"
        );
        Ok(Arc::new(set))
    }
}

#[async_trait]
impl KeyFetcher for JwksKeyFetcher {
    async fn get_public_key(&self, kid: &str) -> Result<Arc<DecodingKey>, KeyFetchError> {
        let set = self.current_key_set().await?;
        set.keys
            .get(kid)
            .cloned()
            .ok_or_else(|| KeyFetchError::NotFound(kid.to_string()))
    }
}

impl std::fmt::Debug for JwksKeyFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksKeyFetcher")
            .field("jwks_url", &self.jwks_url)
            .field("max_cache_duration", &self.max_cache_duration)
            .finish_non_exhaustive()
    }
}

/// Read `max-age` from a `Cache-Control` header
fn cache_max_age(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(CACHE_CONTROL)?.to_str().ok()?;
    value
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|secs| secs.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
