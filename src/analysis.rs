//! Best-effort extraction of structure from free-text analyst notes.
//!
//! Analyst (or language-model) commentary arrives as prose. `AnalystDigest`
//! scrapes the handful of fields the pricing pipeline can use and fills in
//! neutral defaults for anything it cannot find. Extraction never fails: the
//! worst input yields a fully populated default digest.

use crate::valuation::ForecastSignal;
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceDirection {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactor {
    pub factor: String,
    pub impact: u8,
}

/// Structured reading of one analyst note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystDigest {
    /// Price fairness assessment, 0..=100.
    pub price_valuation: u8,
    pub price_direction: PriceDirection,
    /// Expected price change over the horizon, percent.
    pub expected_change_pct: f64,
    pub risk_factors: Vec<RiskFactor>,
    /// Investment recommendation strength, 0..=100.
    pub investment_score: u8,
    pub raw_response: String,
}

impl AnalystDigest {
    /// Scrape a digest out of free text. Missing or unparseable fields keep
    /// their neutral defaults; this never returns an error.
    pub fn from_text(text: &str) -> Self {
        let mut digest = Self {
            price_valuation: 70,
            price_direction: PriceDirection::Flat,
            expected_change_pct: 2.1,
            risk_factors: vec![
                RiskFactor {
                    factor: "Market uncertainty".to_string(),
                    impact: 5,
                },
                RiskFactor {
                    factor: "Macro environment shifts".to_string(),
                    impact: 4,
                },
                RiskFactor {
                    factor: "Regulatory risk".to_string(),
                    impact: 3,
                },
            ],
            investment_score: 65,
            raw_response: text.to_string(),
        };

        if let Some(v) = capture_number(text, r"(?i)price\s+valuation\D{0,20}?(\d{1,3})") {
            digest.price_valuation = v.min(100) as u8;
        }
        if let Some(v) =
            capture_number(text, r"(?i)investment\s+(?:score|recommendation)\D{0,20}?(\d{1,3})")
        {
            digest.investment_score = v.min(100) as u8;
        }

        let lower = text.to_lowercase();
        if ["rise", "increase", "upside", "appreciat"]
            .iter()
            .any(|kw| lower.contains(kw))
        {
            digest.price_direction = PriceDirection::Up;
            digest.expected_change_pct = 8.5;
        } else if ["fall", "decline", "decrease", "downside"]
            .iter()
            .any(|kw| lower.contains(kw))
        {
            digest.price_direction = PriceDirection::Down;
            digest.expected_change_pct = -3.2;
        }

        if let Ok(re) = Regex::new(r"(?im)^risk[^:\n]*:\s*(.+)$") {
            let found: Vec<RiskFactor> = re
                .captures_iter(text)
                .take(4)
                .enumerate()
                .map(|(i, cap)| RiskFactor {
                    factor: cap[1].trim().to_string(),
                    impact: 7 - i as u8,
                })
                .collect();
            if !found.is_empty() {
                digest.risk_factors = found;
            }
        }

        digest
    }

    /// Derive a forecast signal for the pricing gate.
    ///
    /// Confidence maps from the valuation assessment, risk from the mean
    /// stated impact (impacts are on a 0..=10 scale).
    pub fn to_forecast(&self, current_price: f64) -> ForecastSignal {
        let mean_impact = if self.risk_factors.is_empty() {
            5.0
        } else {
            self.risk_factors
                .iter()
                .map(|r| r.impact as f64)
                .sum::<f64>()
                / self.risk_factors.len() as f64
        };

        ForecastSignal {
            predicted_price: current_price * (1.0 + self.expected_change_pct / 100.0),
            confidence: self.price_valuation,
            risk_score: ((mean_impact * 10.0).round() as u8).min(100),
            investment_score: self.investment_score,
            active: true,
            captured_at: Utc::now(),
        }
    }
}

fn capture_number(text: &str, pattern: &str) -> Option<u32> {
    let re = Regex::new(pattern).ok()?;
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_input_yields_complete_defaults() {
        let digest = AnalystDigest::from_text("%%%% ???");
        assert_eq!(digest.price_valuation, 70);
        assert_eq!(digest.investment_score, 65);
        assert_eq!(digest.price_direction, PriceDirection::Flat);
        assert_eq!(digest.risk_factors.len(), 3);
        assert_eq!(digest.raw_response, "%%%% ???");
    }

    #[test]
    fn stated_scores_are_extracted_and_clamped() {
        let digest = AnalystDigest::from_text(
            "Price valuation: 82/100. Investment score: 77. Expect prices to rise.",
        );
        assert_eq!(digest.price_valuation, 82);
        assert_eq!(digest.investment_score, 77);
        assert_eq!(digest.price_direction, PriceDirection::Up);
        assert_eq!(digest.expected_change_pct, 8.5);

        let big = AnalystDigest::from_text("Price valuation: 999");
        assert_eq!(big.price_valuation, 100);
    }

    #[test]
    fn downside_language_flips_the_direction() {
        let digest = AnalystDigest::from_text("We expect values to decline next quarter.");
        assert_eq!(digest.price_direction, PriceDirection::Down);
        assert_eq!(digest.expected_change_pct, -3.2);
    }

    #[test]
    fn risk_lines_are_collected_with_descending_impact() {
        let text = "Risk 1: vacancy creep\nRisk 2: refinancing cost\nRisk 3: permit delays";
        let digest = AnalystDigest::from_text(text);
        assert_eq!(digest.risk_factors.len(), 3);
        assert_eq!(digest.risk_factors[0].factor, "vacancy creep");
        assert_eq!(digest.risk_factors[0].impact, 7);
        assert_eq!(digest.risk_factors[2].impact, 5);
    }

    #[test]
    fn forecast_conversion_scales_the_price() {
        let digest = AnalystDigest::from_text("Price valuation: 80. Prices should increase.");
        let forecast = digest.to_forecast(0.10);
        assert!((forecast.predicted_price - 0.1085).abs() < 1e-12);
        assert_eq!(forecast.confidence, 80);
        assert!(forecast.active);
        assert!(forecast.validate().is_ok());
    }
}
