//! Composite project quality scoring.
//!
//! Pure arithmetic over an indicator snapshot plus the project's location and
//! size classification. No side effects; clamps hold even for pathological
//! indicator ranges.

use crate::market::IndicatorSnapshot;
use crate::valuation::metrics::{LocationBucket, SizeTier};
use serde::{Deserialize, Serialize};

/// Per-dimension sub-scores behind a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub market_score: f64,
    pub financial_score: f64,
    pub construction_score: f64,
    pub economic_score: f64,
    pub composite_score: u8,
}

/// Compute the composite quality score for a project.
///
/// The location multiplier applies to the market sub-score before clamping;
/// the size multiplier applies to the weighted sum before the final clamp.
pub fn composite_score(
    snapshot: &IndicatorSnapshot,
    location: LocationBucket,
    size: SizeTier,
) -> ScoreBreakdown {
    let market_score = (snapshot.real_estate_index * location.multiplier()).min(100.0);
    let financial_score = (100.0 - (snapshot.interest_rate - 3.5) * 10.0).max(0.0);
    let construction_score = (100.0 - (snapshot.construction_cost_index - 110.0) * 2.0).max(0.0);
    let economic_score =
        snapshot.gdp_growth_rate * 15.0 + (3.0 - snapshot.inflation_rate) * 10.0;

    let weighted = 0.30 * market_score
        + 0.25 * financial_score
        + 0.25 * construction_score
        + 0.20 * economic_score;
    let composite = (weighted * size.multiplier()).round().clamp(0.0, 100.0) as u8;

    ScoreBreakdown {
        market_score,
        financial_score,
        construction_score,
        economic_score,
        composite_score: composite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(rei: f64, rate: f64, cci: f64, gdp: f64, infl: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            real_estate_index: rei,
            interest_rate: rate,
            construction_cost_index: cci,
            gdp_growth_rate: gdp,
            inflation_rate: infl,
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn baseline_snapshot_scores_in_healthy_band() {
        let snap = snapshot(100.0, 3.5, 110.0, 2.8, 2.1);
        let b = composite_score(&snap, LocationBucket::Secondary, SizeTier::Mid);
        assert_eq!(b.market_score, 100.0);
        assert_eq!(b.financial_score, 100.0);
        assert_eq!(b.construction_score, 100.0);
        // 2.8*15 + 0.9*10 = 51
        assert!((b.economic_score - 51.0).abs() < 1e-9);
        // 0.30*100 + 0.25*100 + 0.25*100 + 0.20*51 = 90.2 -> 90
        assert_eq!(b.composite_score, 90);
    }

    #[test]
    fn extreme_inputs_stay_clamped() {
        let hot = snapshot(500.0, -5.0, 0.0, 50.0, -20.0);
        let b = composite_score(&hot, LocationBucket::PrimaryMetro, SizeTier::Large);
        assert!(b.composite_score <= 100);

        let cold = snapshot(0.0, 50.0, 500.0, -30.0, 40.0);
        let b = composite_score(&cold, LocationBucket::Other, SizeTier::Small);
        assert_eq!(b.composite_score, 0);
    }

    #[test]
    fn market_score_caps_at_100_before_location_gain() {
        let snap = snapshot(95.0, 3.5, 110.0, 2.8, 2.1);
        let b = composite_score(&snap, LocationBucket::PrimaryMetro, SizeTier::Mid);
        // 95 * 1.2 = 114, capped.
        assert_eq!(b.market_score, 100.0);
    }

    #[test]
    fn location_and_size_move_the_score_monotonically() {
        let snap = snapshot(90.0, 3.5, 110.0, 2.8, 2.1);
        let other = composite_score(&snap, LocationBucket::Other, SizeTier::Small);
        let metro = composite_score(&snap, LocationBucket::PrimaryMetro, SizeTier::Large);
        assert!(metro.composite_score > other.composite_score);
    }
}
