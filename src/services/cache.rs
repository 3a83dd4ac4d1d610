//! Response caching for the consumption chart.
//!
//! Aggregating the chart walks every reading in the database, so the result
//! is cached until either the TTL expires or an upload changes the data:
//!
//! | Event | Effect |
//! |-------|--------|
//! | Chart request, cache warm | served from memory |
//! | Chart request, cache cold | aggregated, then stored |
//! | Successful upload of any kind | generation bumped, whole cache invalidated |
//!
//! Building uploads invalidate too, since dataset labels are building names.
//! A chart whose build overlapped an invalidation is served but not stored.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use crate::common::AppState;
use crate::error::AppResult;
use crate::reports::{self, ChartData};

/// Cache key for the daily consumption chart
pub const DAILY_CONSUMPTION: &str = "charts:daily_consumption";

/// Current cache generation
pub fn generation(state: &AppState) -> u64 {
    state.chart_generation.load(Ordering::Acquire)
}

/// Return the cached daily consumption chart, building it on a miss.
pub async fn daily_consumption(state: &AppState) -> AppResult<Arc<ChartData>> {
    if let Some(cached) = state.chart_cache.get(DAILY_CONSUMPTION).await {
        tracing::debug!(cache_key = DAILY_CONSUMPTION, "cache_hit");
        return Ok(cached);
    }

    tracing::debug!(cache_key = DAILY_CONSUMPTION, "cache_miss");
    let started = generation(state);
    let chart = Arc::new(reports::build_daily_consumption(&state.db).await?);
    store_if_current(state, started, chart.clone()).await;
    Ok(chart)
}

/// Store `chart` unless the cache was invalidated since generation `started`.
pub async fn store_if_current(state: &AppState, started: u64, chart: Arc<ChartData>) {
    if generation(state) != started {
        tracing::debug!(cache_key = DAILY_CONSUMPTION, "stale chart not cached");
        return;
    }

    state.chart_cache.insert(DAILY_CONSUMPTION, chart).await;

    // An invalidation may have landed between the check and the insert
    if generation(state) != started {
        state.chart_cache.invalidate(DAILY_CONSUMPTION).await;
    }
}

/// Drop every cached chart after the underlying data changed.
pub fn invalidate_all(state: &AppState) {
    state.chart_generation.fetch_add(1, Ordering::AcqRel);
    tracing::debug!("chart cache invalidated");
    state.chart_cache.invalidate_all();
}
