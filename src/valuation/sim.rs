//! Twelve-month dividend yield simulation.

use crate::market::IndicatorSnapshot;
use crate::valuation::news::{generate_event, ImpactClass, NewsEvent};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One month of the simulated yield trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldPoint {
    pub month: u8,
    /// Monthly yield, percent.
    pub monthly_yield: f64,
    /// Running sum of monthly yields, percent.
    pub cumulative_yield: f64,
    pub event_description: String,
}

/// Seasonal yield multipliers, month 1..12. Spring and autumn transaction
/// peaks lift the payout; the table averages to roughly 1.0.
const SEASONAL: [f64; 12] = [
    0.90, 0.85, 1.10, 1.15, 1.10, 0.95, 0.85, 0.85, 1.10, 1.15, 1.00, 0.90,
];

const BASE_MONTHLY_YIELD: f64 = 0.8;

fn news_impact(event: &NewsEvent) -> f64 {
    match event.impact_class {
        ImpactClass::Positive => 1.0 + event.severity * 0.3,
        ImpactClass::Negative => 1.0 - event.severity * 0.3,
        ImpactClass::Neutral => 1.0,
    }
}

/// Simulate the full 12-month yield series.
///
/// The series is regenerated wholesale on every call; the news draw is the
/// only non-deterministic input, so a seeded RNG makes the run reproducible.
pub fn simulate_yields<R: Rng + ?Sized>(
    rng: &mut R,
    snapshot: &IndicatorSnapshot,
    composite_score: u8,
    location: &str,
    project_type: &str,
) -> Vec<YieldPoint> {
    let market_multiplier =
        (snapshot.real_estate_index / 100.0) * (snapshot.gdp_growth_rate / 3.0);
    let grade_multiplier = composite_score as f64 / 70.0;

    let mut cumulative = 0.0;
    (1..=12u8)
        .map(|month| {
            let event = generate_event(
                rng,
                month,
                snapshot.real_estate_index,
                composite_score,
                location,
                project_type,
            );
            let monthly_yield = BASE_MONTHLY_YIELD
                * SEASONAL[month as usize - 1]
                * market_multiplier
                * grade_multiplier
                * news_impact(&event);
            cumulative += monthly_yield;

            YieldPoint {
                month,
                monthly_yield,
                cumulative_yield: cumulative,
                event_description: event.text,
            }
        })
        .collect()
}
