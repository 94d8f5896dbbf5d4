//! Valuation composition: token price from score, indicators, and an
//! optional forecast signal.
//!
//! Two pricing strategies exist side by side. `Hybrid` derives the price from
//! indicator deltas around their neutral points; `Weighted` mixes an oracle
//! ratio, the composite score, and the base price under a caller-supplied
//! weight triple. They are intentionally kept as distinct named strategies;
//! neither is canonical.

use crate::error::ValuationError;
use crate::market::IndicatorSnapshot;
use crate::valuation::metrics::SizeTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weight triple for the weighted strategy. Must sum to exactly 100; the
/// fields are private so every triple, constructed or deserialized, has
/// passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights")]
pub struct ValuationWeights {
    oracle: u8,
    custom: u8,
    base: u8,
}

#[derive(Deserialize)]
struct RawWeights {
    oracle: u8,
    custom: u8,
    base: u8,
}

impl TryFrom<RawWeights> for ValuationWeights {
    type Error = ValuationError;

    fn try_from(raw: RawWeights) -> Result<Self, Self::Error> {
        Self::new(raw.oracle, raw.custom, raw.base)
    }
}

impl ValuationWeights {
    pub fn new(oracle: u8, custom: u8, base: u8) -> Result<Self, ValuationError> {
        let sum = oracle as u16 + custom as u16 + base as u16;
        if sum != 100 {
            return Err(ValuationError::InvalidWeightConfiguration {
                oracle,
                custom,
                base,
                sum,
            });
        }
        Ok(Self {
            oracle,
            custom,
            base,
        })
    }

    pub fn oracle(&self) -> u8 {
        self.oracle
    }

    pub fn custom(&self) -> u8 {
        self.custom
    }

    pub fn base(&self) -> u8 {
        self.base
    }
}

/// Probabilistic forecast from the analysis assistant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSignal {
    pub predicted_price: f64,
    pub confidence: u8,
    pub risk_score: u8,
    pub investment_score: u8,
    pub active: bool,
    pub captured_at: DateTime<Utc>,
}

impl ForecastSignal {
    /// Confidence floor below which the forecast is ignored entirely.
    pub const CONFIDENCE_GATE: u8 = 60;

    pub fn validate(&self) -> Result<(), ValuationError> {
        for (name, value) in [
            ("confidence", self.confidence),
            ("riskScore", self.risk_score),
            ("investmentScore", self.investment_score),
        ] {
            if value > 100 {
                return Err(ValuationError::MalformedForecastSignal {
                    reason: format!("{name} out of range: {value}"),
                });
            }
        }
        if !self.predicted_price.is_finite() || self.predicted_price < 0.0 {
            return Err(ValuationError::MalformedForecastSignal {
                reason: format!("predictedPrice not a valid price: {}", self.predicted_price),
            });
        }
        Ok(())
    }
}

/// How the strategy price is derived before forecast gating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PricingStrategy {
    /// Indicator-delta pricing with a smooth time drift.
    Hybrid,
    /// Oracle/score/base mix under a validated weight triple.
    Weighted(ValuationWeights),
}

/// Everything a strategy needs to produce a price.
#[derive(Debug, Clone, Copy)]
pub struct ValuationInputs<'a> {
    pub base_price: f64,
    pub snapshot: &'a IndicatorSnapshot,
    pub composite_score: u8,
    pub size: SizeTier,
    /// Current oracle price, when one is available.
    pub oracle_price: Option<f64>,
    /// Wall-clock instant for the hybrid time drift; injected for testability.
    pub now: DateTime<Utc>,
}

const SECS_PER_DAY: f64 = 60.0 * 60.0 * 24.0;

/// Price from the chosen strategy, before any forecast blending.
pub fn strategy_price(strategy: PricingStrategy, inputs: &ValuationInputs<'_>) -> f64 {
    match strategy {
        PricingStrategy::Hybrid => hybrid_price(inputs),
        PricingStrategy::Weighted(weights) => weighted_price(weights, inputs),
    }
}

fn hybrid_price(inputs: &ValuationInputs<'_>) -> f64 {
    let snap = inputs.snapshot;
    let market_adj = (snap.real_estate_index - 100.0) / 100.0 * 0.15;
    let risk_adj = (inputs.composite_score as f64 - 70.0) / 100.0 * 0.08;
    let rate_impact = -(snap.interest_rate - 3.5) / 100.0 * 0.05;
    // Smooth drift so the price is not a flat line between polls. Not a
    // random source.
    let time_drift = (inputs.now.timestamp() as f64 / SECS_PER_DAY).sin() * 0.02;

    inputs.base_price
        * inputs.size.multiplier()
        * (1.0 + market_adj + risk_adj + rate_impact + time_drift)
}

fn weighted_price(weights: ValuationWeights, inputs: &ValuationInputs<'_>) -> f64 {
    // A zero oracle weight or a missing oracle both neutralize the ratio.
    let oracle_ratio = if weights.oracle == 0 {
        1.0
    } else {
        match inputs.oracle_price {
            Some(p) if inputs.base_price > 0.0 => p / inputs.base_price,
            _ => 1.0,
        }
    };
    let custom_component = (50.0 + inputs.composite_score as f64) / 100.0;

    inputs.base_price
        * (weights.oracle as f64 * oracle_ratio
            + weights.custom as f64 * custom_component
            + weights.base as f64)
        / 100.0
}

/// Blend a strategy price toward an active, confident forecast.
///
/// Below the confidence gate the strategy price passes through untouched. At
/// or above it the price moves toward `predicted_price` in proportion to
/// confidence, then the blend is discounted by the risk score (higher risk
/// pulls the result down).
pub fn apply_forecast(price: f64, forecast: &ForecastSignal) -> f64 {
    if !forecast.active || forecast.confidence < ForecastSignal::CONFIDENCE_GATE {
        return price;
    }
    let blend = forecast.confidence as f64 / 100.0;
    let blended = price * (1.0 - blend) + forecast.predicted_price * blend;
    blended * (1.0 - forecast.risk_score as f64 / 100.0 * 0.15)
}

/// Full composition: strategy price plus validated forecast gating.
pub fn compose_price(
    strategy: PricingStrategy,
    inputs: &ValuationInputs<'_>,
    forecast: Option<&ForecastSignal>,
) -> Result<f64, ValuationError> {
    let price = strategy_price(strategy, inputs);
    match forecast {
        Some(signal) => {
            signal.validate()?;
            Ok(apply_forecast(price, signal))
        }
        None => Ok(price),
    }
}
