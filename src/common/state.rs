use moka::future::Cache;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

use crate::config::Config;
use crate::reports::ChartData;

/// Cache for computed chart payloads, keyed by chart name.
pub type ChartCache = Cache<&'static str, Arc<ChartData>>;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub chart_cache: ChartCache,
    /// Bumped on every invalidation; a chart built across a bump is not cached
    pub chart_generation: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let cache: ChartCache = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(config.chart_cache_ttl_seconds))
            .build();

        Self {
            db,
            config: Arc::new(config),
            chart_cache: cache,
            chart_generation: Arc::new(AtomicU64::new(0)),
        }
    }
}
