//! Project-specific quality metrics and the classification multipliers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Externally supplied project quality metrics, read-only to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    /// Local demand index, 0..=1000.
    pub local_demand_index: u32,
    /// Development progress percentage, 0..=100.
    pub development_progress: u8,
    /// Infrastructure score, 0..=100.
    pub infra_score: u8,
    pub last_updated: DateTime<Utc>,
}

impl QualityMetrics {
    pub fn new(local_demand_index: u32, development_progress: u8, infra_score: u8) -> Self {
        Self {
            local_demand_index: local_demand_index.min(1000),
            development_progress: development_progress.min(100),
            infra_score: infra_score.min(100),
            last_updated: Utc::now(),
        }
    }
}

/// Location bucket for the market sub-score multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationBucket {
    /// Primary metropolitan area.
    PrimaryMetro,
    /// Secondary city.
    Secondary,
    Other,
}

impl LocationBucket {
    pub fn multiplier(self) -> f64 {
        match self {
            LocationBucket::PrimaryMetro => 1.2,
            LocationBucket::Secondary => 1.0,
            LocationBucket::Other => 0.9,
        }
    }
}

/// Project size tier for the composite-score multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTier {
    Large,
    Mid,
    Small,
}

impl SizeTier {
    pub fn multiplier(self) -> f64 {
        match self {
            SizeTier::Large => 1.1,
            SizeTier::Mid => 1.0,
            SizeTier::Small => 0.95,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_are_clamped_on_construction() {
        let m = QualityMetrics::new(5000, 200, 250);
        assert_eq!(m.local_demand_index, 1000);
        assert_eq!(m.development_progress, 100);
        assert_eq!(m.infra_score, 100);
    }

    #[test]
    fn multipliers_match_documented_buckets() {
        assert_eq!(LocationBucket::PrimaryMetro.multiplier(), 1.2);
        assert_eq!(LocationBucket::Secondary.multiplier(), 1.0);
        assert_eq!(LocationBucket::Other.multiplier(), 0.9);
        assert_eq!(SizeTier::Large.multiplier(), 1.1);
        assert_eq!(SizeTier::Mid.multiplier(), 1.0);
        assert_eq!(SizeTier::Small.multiplier(), 0.95);
    }
}
