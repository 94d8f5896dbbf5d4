//! Macro indicator identifiers and the snapshot bundle fed to the scorer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The five macro indicators the valuation pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    RealEstateIndex,
    InterestRate,
    ConstructionCostIndex,
    GdpGrowthRate,
    InflationRate,
}

impl Indicator {
    /// All indicators, in snapshot field order.
    pub const ALL: [Indicator; 5] = [
        Indicator::RealEstateIndex,
        Indicator::InterestRate,
        Indicator::ConstructionCostIndex,
        Indicator::GdpGrowthRate,
        Indicator::InflationRate,
    ];

    /// Documented substitute when the indicator's source is unavailable.
    pub fn fallback(self) -> f64 {
        match self {
            Indicator::RealEstateIndex => 100.0,
            Indicator::InterestRate => 3.5,
            Indicator::ConstructionCostIndex => 110.0,
            Indicator::GdpGrowthRate => 2.8,
            Indicator::InflationRate => 2.1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Indicator::RealEstateIndex => "real_estate_index",
            Indicator::InterestRate => "interest_rate",
            Indicator::ConstructionCostIndex => "construction_cost_index",
            Indicator::GdpGrowthRate => "gdp_growth_rate",
            Indicator::InflationRate => "inflation_rate",
        }
    }
}

/// Immutable bundle of all five indicators captured at one instant.
///
/// Individual fields refresh independently in the cache; a snapshot is just
/// the assembled view handed to the scorer and simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub real_estate_index: f64,
    pub interest_rate: f64,
    pub construction_cost_index: f64,
    pub gdp_growth_rate: f64,
    pub inflation_rate: f64,
    pub captured_at: DateTime<Utc>,
}

impl IndicatorSnapshot {
    pub fn get(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::RealEstateIndex => self.real_estate_index,
            Indicator::InterestRate => self.interest_rate,
            Indicator::ConstructionCostIndex => self.construction_cost_index,
            Indicator::GdpGrowthRate => self.gdp_growth_rate,
            Indicator::InflationRate => self.inflation_rate,
        }
    }

    /// Snapshot built entirely from fallback constants.
    pub fn fallback() -> Self {
        Self {
            real_estate_index: Indicator::RealEstateIndex.fallback(),
            interest_rate: Indicator::InterestRate.fallback(),
            construction_cost_index: Indicator::ConstructionCostIndex.fallback(),
            gdp_growth_rate: Indicator::GdpGrowthRate.fallback(),
            inflation_rate: Indicator::InflationRate.fallback(),
            captured_at: Utc::now(),
        }
    }
}
