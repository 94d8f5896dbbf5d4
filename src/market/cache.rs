//! TTL cache over the indicator source.
//!
//! One in-memory store per running instance, keyed by indicator. Entries
//! expire after the injected TTL (default 5 minutes) and are refreshed on
//! demand; refreshes are idempotent overwrites, so a racing pair of refreshes
//! costs at most a redundant fetch. A failed fetch is swallowed and replaced
//! by the indicator's documented fallback constant; the fallback itself is
//! never cached, so the next call retries the source.

use crate::market::indicators::{Indicator, IndicatorSnapshot};
use crate::market::source::IndicatorSource;
use chrono::Utc;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Default entry TTL: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Default, Clone)]
struct CacheMetrics {
    hits: u64,
    misses: u64,
    fallbacks: u64,
}

/// Cached access to the five macro indicators.
pub struct IndicatorCache {
    cache: Cache<Indicator, f64>,
    source: Arc<dyn IndicatorSource>,
    metrics: Arc<Mutex<CacheMetrics>>,
}

impl IndicatorCache {
    /// Build a cache with the default 5-minute TTL.
    pub fn new(source: Arc<dyn IndicatorSource>) -> Self {
        Self::with_ttl(source, DEFAULT_TTL)
    }

    /// Build a cache with an explicit TTL (tests use short ones).
    pub fn with_ttl(source: Arc<dyn IndicatorSource>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(Indicator::ALL.len() as u64)
            .time_to_live(ttl)
            .build();
        Self {
            cache,
            source,
            metrics: Arc::new(Mutex::new(CacheMetrics::default())),
        }
    }

    /// Get one indicator, refreshing through the source if the cached value
    /// expired. Never fails: a broken source yields the fallback constant.
    pub async fn get(&self, indicator: Indicator) -> f64 {
        if let Some(value) = self.cache.get(&indicator).await {
            self.metrics.lock().await.hits += 1;
            debug!(indicator = indicator.name(), value, "indicator cache hit");
            return value;
        }
        self.metrics.lock().await.misses += 1;

        match self.source.fetch(indicator).await {
            Ok(value) => {
                self.cache.insert(indicator, value).await;
                debug!(indicator = indicator.name(), value, "indicator refreshed");
                value
            }
            Err(e) => {
                self.metrics.lock().await.fallbacks += 1;
                warn!(
                    indicator = indicator.name(),
                    error = %e,
                    "indicator source failed, using fallback constant"
                );
                indicator.fallback()
            }
        }
    }

    /// Fetch all five indicators concurrently and assemble a snapshot.
    ///
    /// Each field resolves independently; one failing source never disturbs
    /// the others, and every key is always present in the result.
    pub async fn get_all(&self) -> IndicatorSnapshot {
        let (real_estate_index, interest_rate, construction_cost_index, gdp_growth_rate, inflation_rate) = tokio::join!(
            self.get(Indicator::RealEstateIndex),
            self.get(Indicator::InterestRate),
            self.get(Indicator::ConstructionCostIndex),
            self.get(Indicator::GdpGrowthRate),
            self.get(Indicator::InflationRate),
        );

        IndicatorSnapshot {
            real_estate_index,
            interest_rate,
            construction_cost_index,
            gdp_growth_rate,
            inflation_rate,
            captured_at: Utc::now(),
        }
    }

    /// Drop all cached entries; the next access refetches.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// (hits, misses, fallbacks) since construction.
    pub async fn stats(&self) -> (u64, u64, u64) {
        let m = self.metrics.lock().await;
        (m.hits, m.misses, m.fallbacks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Source returning a fixed value, optionally failing for one indicator.
    struct FixedSource {
        value: f64,
        failing: Option<Indicator>,
        calls: AtomicU64,
    }

    impl FixedSource {
        fn new(value: f64) -> Self {
            Self {
                value,
                failing: None,
                calls: AtomicU64::new(0),
            }
        }

        fn failing_on(value: f64, indicator: Indicator) -> Self {
            Self {
                value,
                failing: Some(indicator),
                calls: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl IndicatorSource for FixedSource {
        async fn fetch(&self, indicator: Indicator) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing == Some(indicator) {
                return Err(anyhow!("source down"));
            }
            Ok(self.value)
        }
    }

    #[tokio::test]
    async fn cached_value_is_served_until_ttl() {
        let source = Arc::new(FixedSource::new(120.0));
        let cache = IndicatorCache::with_ttl(source.clone(), Duration::from_secs(60));

        assert_eq!(cache.get(Indicator::RealEstateIndex).await, 120.0);
        assert_eq!(cache.get(Indicator::RealEstateIndex).await, 120.0);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        let (hits, misses, fallbacks) = cache.stats().await;
        assert_eq!((hits, misses, fallbacks), (1, 1, 0));
    }

    #[tokio::test]
    async fn single_failing_indicator_falls_back_without_disturbing_others() {
        let source = Arc::new(FixedSource::failing_on(120.0, Indicator::InterestRate));
        let cache = IndicatorCache::with_ttl(source, Duration::from_secs(60));

        let snap = cache.get_all().await;
        assert_eq!(snap.real_estate_index, 120.0);
        assert_eq!(snap.construction_cost_index, 120.0);
        assert_eq!(snap.gdp_growth_rate, 120.0);
        assert_eq!(snap.inflation_rate, 120.0);
        // The failed field carries its documented fallback.
        assert_eq!(snap.interest_rate, Indicator::InterestRate.fallback());

        let (_, _, fallbacks) = cache.stats().await;
        assert_eq!(fallbacks, 1);
    }

    #[tokio::test]
    async fn fallback_is_not_cached() {
        let source = Arc::new(FixedSource::failing_on(99.0, Indicator::GdpGrowthRate));
        let cache = IndicatorCache::with_ttl(source.clone(), Duration::from_secs(60));

        cache.get(Indicator::GdpGrowthRate).await;
        cache.get(Indicator::GdpGrowthRate).await;
        // Both calls re-hit the source; failures do not poison the cache.
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clear_forces_refetch() {
        let source = Arc::new(FixedSource::new(105.0));
        let cache = IndicatorCache::with_ttl(source.clone(), Duration::from_secs(60));

        cache.get(Indicator::RealEstateIndex).await;
        cache.clear();
        // moka invalidation is eventually visible; give it a beat.
        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.get(Indicator::RealEstateIndex).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
