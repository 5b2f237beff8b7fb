use crate::core::protocol::AwsJsonProtocol;
use crate::domain::model::{Endpoint, Outcome};
use crate::domain::ports::EndpointDiscovery;
use crate::operations::DescribeEndpoints;
use crate::utils::error::ClientError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::OnceCell;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct CachedEndpoint {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedEndpoint {
    pub fn from_discovered(endpoint: &Endpoint, now: DateTime<Utc>) -> Self {
        Self {
            url: endpoint.url(),
            expires_at: now + Duration::minutes(endpoint.cache_period_in_minutes.max(0)),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

type Slot = Arc<OnceCell<Outcome<CachedEndpoint>>>;

/// Discovered endpoints by resolution key.
///
/// A missing or expired key is filled by exactly one discovery call; callers
/// that arrive while it is in flight wait on the same slot and share its
/// result. Failed discoveries are handed to those waiters and then dropped,
/// so the next lookup tries again.
#[derive(Debug, Default)]
pub struct EndpointCache {
    slots: RwLock<HashMap<String, Slot>>,
}

impl EndpointCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_discover<F, Fut>(
        &self,
        key: &str,
        now: DateTime<Utc>,
        discover: F,
    ) -> Outcome<CachedEndpoint>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Outcome<CachedEndpoint>>,
    {
        let mut slot = self.slot(key);
        if let Some(Ok(entry)) = slot.get() {
            if !entry.is_expired(now) {
                return Ok(entry.clone());
            }
            tracing::debug!("Endpoint for {} expired at {}", key, entry.expires_at);
            self.evict(key, &slot);
            slot = self.slot(key);
        }

        let result = slot.get_or_init(discover).await.clone();
        if result.is_err() {
            self.evict(key, &slot);
        }
        result
    }

    pub fn get(&self, key: &str) -> Option<CachedEndpoint> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .get(key)
            .and_then(|slot| slot.get())
            .and_then(|result| result.as_ref().ok())
            .cloned()
    }

    pub fn invalidate(&self, key: &str) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.remove(key);
    }

    /// Drops the entry for `key` only if it still resolves to `url`.
    ///
    /// A slot whose discovery is still running, or that already holds a
    /// different endpoint, is left alone so concurrent callers rejected by the
    /// same endpoint share one rediscovery.
    pub fn invalidate_if(&self, key: &str, url: &str) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let stale = slots
            .get(key)
            .and_then(|slot| slot.get())
            .is_some_and(|result| matches!(result, Ok(entry) if entry.url == url));
        if stale {
            slots.remove(key);
        }
        stale
    }

    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &str) -> Slot {
        {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = slots.get(key) {
                return Arc::clone(slot);
            }
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.to_string()).or_default())
    }

    /// Removes `slot` only if it is still the current one for `key`.
    fn evict(&self, key: &str, slot: &Slot) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if slots.get(key).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            slots.remove(key);
        }
    }
}

/// Discovers endpoints by calling `DescribeEndpoints` on the static endpoint.
pub struct DescribeEndpointsDiscovery {
    protocol: Arc<AwsJsonProtocol>,
    endpoint: String,
}

impl DescribeEndpointsDiscovery {
    pub fn new(protocol: Arc<AwsJsonProtocol>, endpoint: impl Into<String>) -> Self {
        Self {
            protocol,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl EndpointDiscovery for DescribeEndpointsDiscovery {
    async fn discover(&self) -> Outcome<Vec<Endpoint>> {
        let invocation_id = Uuid::new_v4().to_string();
        let output = self
            .protocol
            .invoke(&self.endpoint, &DescribeEndpoints::default(), &invocation_id)
            .await?;
        Ok(output.endpoints)
    }
}

pub struct EndpointResolver {
    cache_key: String,
    static_endpoint: String,
    discovery_enabled: bool,
    override_endpoint: RwLock<Option<String>>,
    cache: EndpointCache,
    discovery: Arc<dyn EndpointDiscovery>,
}

impl EndpointResolver {
    pub fn new(
        cache_key: impl Into<String>,
        static_endpoint: impl Into<String>,
        discovery_enabled: bool,
        override_endpoint: Option<String>,
        discovery: Arc<dyn EndpointDiscovery>,
    ) -> Self {
        Self {
            cache_key: cache_key.into(),
            static_endpoint: static_endpoint.into(),
            discovery_enabled,
            override_endpoint: RwLock::new(override_endpoint),
            cache: EndpointCache::new(),
            discovery,
        }
    }

    /// Override, then discovered endpoint, then the static endpoint.
    pub async fn resolve(&self, uses_discovery: bool) -> Outcome<String> {
        if let Some(url) = self.override_endpoint() {
            return Ok(url);
        }
        if !uses_discovery || !self.discovery_enabled {
            return Ok(self.static_endpoint.clone());
        }

        let entry = self
            .cache
            .get_or_discover(&self.cache_key, Utc::now(), || self.discover())
            .await?;
        Ok(entry.url)
    }

    async fn discover(&self) -> Outcome<CachedEndpoint> {
        tracing::debug!("Discovering endpoint via {}", self.static_endpoint);
        let endpoints = self.discovery.discover().await.map_err(|err| {
            tracing::warn!("Endpoint discovery failed: {}", err);
            ClientError::discovery(err)
        })?;

        let endpoint = endpoints
            .first()
            .ok_or_else(|| ClientError::EndpointDiscoveryError {
                message: "DescribeEndpoints returned no endpoints".to_string(),
                source: None,
            })?;
        let cached = CachedEndpoint::from_discovered(endpoint, Utc::now());
        tracing::info!("Discovered endpoint {} (valid until {})", cached.url, cached.expires_at);
        Ok(cached)
    }

    /// True when calls that use discovery actually go through the cache.
    pub fn discovery_active(&self) -> bool {
        self.discovery_enabled && self.override_endpoint().is_none()
    }

    pub fn override_endpoint(&self) -> Option<String> {
        self.override_endpoint
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_override(&self, url: Option<String>) {
        *self
            .override_endpoint
            .write()
            .unwrap_or_else(PoisonError::into_inner) = url;
    }

    pub fn invalidate(&self) {
        self.cache.invalidate(&self.cache_key);
    }

    /// Forgets the discovered endpoint if it is still `url`.
    pub fn invalidate_endpoint(&self, url: &str) -> bool {
        self.cache.invalidate_if(&self.cache_key, url)
    }

    pub fn cached_endpoint(&self) -> Option<CachedEndpoint> {
        self.cache.get(&self.cache_key)
    }
}
