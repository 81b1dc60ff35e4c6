//! Caching layer for route results.
//!
//! Results are keyed by the generation of the graph that produced them, so
//! a result computed on an old graph can never be returned for a new one.
//! Publishing a graph also drops everything cached so far.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::planner::RouteResult;

/// Cache key: (graph generation, source, destination).
type RouteKey = (u64, String, String);

/// Configuration for the route cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 10_000,
        }
    }
}

/// Cache for route results.
#[derive(Clone)]
pub struct RouteCache {
    routes: MokaCache<RouteKey, Arc<RouteResult>>,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { routes }
    }

    /// Get a cached route.
    pub async fn get(
        &self,
        generation: u64,
        source: &str,
        destination: &str,
    ) -> Option<Arc<RouteResult>> {
        self.routes
            .get(&(generation, source.to_string(), destination.to_string()))
            .await
    }

    /// Insert a route into the cache.
    pub async fn insert(
        &self,
        generation: u64,
        source: &str,
        destination: &str,
        route: Arc<RouteResult>,
    ) {
        self.routes
            .insert((generation, source.to_string(), destination.to_string()), route)
            .await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
    }
}

impl std::fmt::Debug for RouteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteCache")
            .field("entry_count", &self.routes.entry_count())
            .finish()
    }
}
