//! API-boundary output types.
//!
//! One normalized valuation shape regardless of where the numbers came from;
//! provenance metadata says how much to trust them.

use crate::ledger::DividendSummary;
use crate::valuation::{InvestmentGrade, QualityMetrics, YieldPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the valuation's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Every field read from the ledger.
    Ledger,
    /// Ledger skipped or unreachable; everything computed locally.
    Calculation,
    /// Ledger reachable but at least one field was substituted locally.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Disabled,
}

/// Trust metadata attached to every valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub connection_status: ConnectionStatus,
    pub data_source: DataSource,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub troubleshooting_tip: Option<String>,
}

/// Dividend trajectory at the boundary: percentages rounded to 2 decimals,
/// one event string per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendData {
    pub months: Vec<u8>,
    pub monthly_yields: Vec<f64>,
    pub cumulative_yields: Vec<f64>,
    pub events: Vec<String>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl DividendData {
    /// Convert a ledger summary (basis points) to boundary percentages.
    pub fn from_ledger(summary: &DividendSummary) -> Self {
        Self {
            months: summary.months.clone(),
            monthly_yields: summary
                .yields_bp
                .iter()
                .map(|bp| round2(*bp as f64 / 100.0))
                .collect(),
            cumulative_yields: summary
                .cumulative_bp
                .iter()
                .map(|bp| round2(*bp as f64 / 100.0))
                .collect(),
            events: summary.events.clone(),
        }
    }

    /// Convert a locally simulated series (already in percent).
    pub fn from_simulation(series: &[YieldPoint]) -> Self {
        Self {
            months: series.iter().map(|p| p.month).collect(),
            monthly_yields: series.iter().map(|p| round2(p.monthly_yield)).collect(),
            cumulative_yields: series.iter().map(|p| round2(p.cumulative_yield)).collect(),
            events: series.iter().map(|p| p.event_description.clone()).collect(),
        }
    }
}

/// Full valuation for one project, as served at the API boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectValuation {
    pub project_id: u64,
    pub base_price: f64,
    pub current_price: f64,
    pub ai_enhanced_price: f64,
    pub custom_score: u8,
    pub investment_grade: InvestmentGrade,
    pub custom_metrics: QualityMetrics,
    pub dividend_data: DividendData,
    pub provenance: Provenance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_basis_points_become_two_decimal_percent() {
        let summary = DividendSummary {
            months: vec![1, 2],
            yields_bp: vec![83, 127],
            cumulative_bp: vec![83, 210],
            events: vec!["a".into(), "b".into()],
        };
        let data = DividendData::from_ledger(&summary);
        assert_eq!(data.monthly_yields, vec![0.83, 1.27]);
        assert_eq!(data.cumulative_yields, vec![0.83, 2.10]);
    }

    #[test]
    fn simulated_yields_round_to_two_decimals() {
        let series = vec![YieldPoint {
            month: 1,
            monthly_yield: 0.87654,
            cumulative_yield: 0.87654,
            event_description: "Month 1: quiet".into(),
        }];
        let data = DividendData::from_simulation(&series);
        assert_eq!(data.monthly_yields, vec![0.88]);
    }

    #[test]
    fn provenance_omits_absent_tip_in_json() {
        let p = Provenance {
            connection_status: ConnectionStatus::Connected,
            data_source: DataSource::Ledger,
            timestamp: Utc::now(),
            troubleshooting_tip: None,
        };
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("troubleshootingTip"));
        assert!(json.contains("\"dataSource\":\"ledger\""));
    }
}
