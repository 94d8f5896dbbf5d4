//! Indicator sources.
//!
//! `IndicatorSource` is the seam between the cache and wherever indicator
//! values actually come from. The default `SimulatedSource` synthesises each
//! series from deterministic seasonal/cyclical terms plus bounded jitter, so
//! the pipeline produces plausible, slowly-moving values without any external
//! dependency. A production deployment swaps in an HTTP-backed source.

use crate::market::indicators::Indicator;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, Timelike, Utc};
use rand::Rng;
use std::f64::consts::PI;

/// Provider of raw indicator values.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    async fn fetch(&self, indicator: Indicator) -> Result<f64>;
}

/// Time-seeded synthetic indicator series.
///
/// Each series follows the shape of the underlying market statistic it stands
/// in for: the real-estate index carries an annual seasonal swing on top of a
/// long-term trend, the interest rate drifts on a monthly cycle, construction
/// costs creep upward with inflation, and so on. Jitter is small and bounded;
/// none of this needs to be cryptographically secure.
#[derive(Debug, Default, Clone)]
pub struct SimulatedSource;

impl SimulatedSource {
    pub fn new() -> Self {
        Self
    }

    fn real_estate_index(&self) -> f64 {
        let now = Utc::now();
        let day_of_year = now.ordinal() as f64;
        let hour = now.hour() as f64;

        let base = 100.0;
        let long_term_trend = (now.year() - 2023) as f64 * 2.5;
        let seasonal = (day_of_year / 365.0 * 2.0 * PI).sin() * 8.0;
        let weekly = (day_of_year / 7.0 * 2.0 * PI).sin() * 2.0;
        let hourly = (hour / 24.0 * 2.0 * PI).sin() * 1.0;
        let jitter = (rand::thread_rng().gen::<f64>() - 0.5) * 4.0;

        // Index is floored; the market never reads below 85 in this model.
        (base + long_term_trend + seasonal + weekly + hourly + jitter).max(85.0)
    }

    fn interest_rate(&self) -> f64 {
        let secs = Utc::now().timestamp() as f64;
        let monthly = (secs / (60.0 * 60.0 * 24.0 * 30.0)).sin() * 0.5;
        let jitter = (rand::thread_rng().gen::<f64>() - 0.5) * 0.2;
        3.5 + monthly + jitter
    }

    fn construction_cost_index(&self) -> f64 {
        let now = Utc::now();
        let months_since_2023 = ((now.year() - 2023) * 12 + now.month0() as i32) as f64;
        let secs = now.timestamp() as f64;

        let inflation_drift = months_since_2023 * 0.3;
        let weekly = (secs / (60.0 * 60.0 * 24.0 * 7.0)).sin() * 2.0;
        let jitter = (rand::thread_rng().gen::<f64>() - 0.5) * 2.0;
        110.0 + inflation_drift + weekly + jitter
    }

    fn gdp_growth_rate(&self) -> f64 {
        let secs = Utc::now().timestamp() as f64;
        let cycle = (secs / (60.0 * 60.0 * 24.0 * 365.0)).sin() * 0.5;
        let jitter = (rand::thread_rng().gen::<f64>() - 0.5) * 0.4;
        2.8 + cycle + jitter
    }

    fn inflation_rate(&self) -> f64 {
        let secs = Utc::now().timestamp() as f64;
        let half_year = (secs / (60.0 * 60.0 * 24.0 * 180.0)).sin() * 0.3;
        let jitter = (rand::thread_rng().gen::<f64>() - 0.5) * 0.3;
        2.1 + half_year + jitter
    }
}

#[async_trait]
impl IndicatorSource for SimulatedSource {
    async fn fetch(&self, indicator: Indicator) -> Result<f64> {
        Ok(match indicator {
            Indicator::RealEstateIndex => self.real_estate_index(),
            Indicator::InterestRate => self.interest_rate(),
            Indicator::ConstructionCostIndex => self.construction_cost_index(),
            Indicator::GdpGrowthRate => self.gdp_growth_rate(),
            Indicator::InflationRate => self.inflation_rate(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_series_stay_within_envelopes() {
        let source = SimulatedSource::new();
        for _ in 0..20 {
            let rei = source.fetch(Indicator::RealEstateIndex).await.unwrap();
            assert!(rei >= 85.0, "real estate index floored at 85, got {rei}");

            let rate = source.fetch(Indicator::InterestRate).await.unwrap();
            assert!((2.8..=4.2).contains(&rate), "rate out of band: {rate}");

            let gdp = source.fetch(Indicator::GdpGrowthRate).await.unwrap();
            assert!((2.0..=3.6).contains(&gdp), "gdp out of band: {gdp}");

            let infl = source.fetch(Indicator::InflationRate).await.unwrap();
            assert!((1.5..=2.7).contains(&infl), "inflation out of band: {infl}");
        }
    }

    #[tokio::test]
    async fn every_indicator_is_fetchable() {
        let source = SimulatedSource::new();
        for ind in Indicator::ALL {
            assert!(source.fetch(ind).await.unwrap().is_finite());
        }
    }
}
