//! Read-only access to the authoritative ledger.
//!
//! `LedgerClient` is the seam the orchestrator depends on; `rpc::JsonRpcLedger`
//! is the production implementation over an EVM JSON-RPC endpoint. Every
//! method is a single read; the orchestrator owns timeouts, fan-out, and
//! fallback.

pub mod rpc;

use crate::valuation::QualityMetrics;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a successful reachability probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub chain_id: u64,
    pub network_name: String,
    pub block_height: u64,
}

/// Human-readable name for a chain id.
pub fn network_name(chain_id: u64) -> String {
    match chain_id {
        1 => "Ethereum Mainnet".to_string(),
        5 => "Goerli Testnet".to_string(),
        11155111 => "Sepolia Testnet".to_string(),
        1337 | 31337 => "Hardhat Local".to_string(),
        other => format!("Chain {other}"),
    }
}

/// On-ledger project registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Base token price, in whole tokens.
    pub base_price: f64,
    pub total_supply: u64,
    pub is_active: bool,
    pub is_verified: bool,
}

/// Dividend history as the ledger stores it: four parallel arrays, yields in
/// basis points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendSummary {
    pub months: Vec<u8>,
    pub yields_bp: Vec<u32>,
    pub cumulative_bp: Vec<u32>,
    pub events: Vec<String>,
}

impl DividendSummary {
    /// Parallel arrays are only meaningful when their lengths agree.
    pub fn is_consistent(&self) -> bool {
        self.months.len() == self.yields_bp.len()
            && self.months.len() == self.cumulative_bp.len()
            && self.months.len() == self.events.len()
    }
}

/// Read-only ledger operations the valuation pipeline consumes.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Network identity plus current height; the reachability check.
    async fn probe(&self) -> Result<ProbeResult>;

    async fn project_record(&self, project_id: u64) -> Result<ProjectRecord>;
    async fn current_token_price(&self, project_id: u64) -> Result<f64>;
    async fn ai_enhanced_price(&self, project_id: u64) -> Result<f64>;
    async fn composite_score(&self, project_id: u64) -> Result<u8>;
    async fn investment_grade(&self, project_id: u64) -> Result<String>;
    async fn quality_metrics(&self, project_id: u64) -> Result<QualityMetrics>;
    async fn dividend_summary(&self, project_id: u64) -> Result<DividendSummary>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_chain_ids_map_to_names() {
        assert_eq!(network_name(1), "Ethereum Mainnet");
        assert_eq!(network_name(11155111), "Sepolia Testnet");
        assert_eq!(network_name(31337), "Hardhat Local");
        assert_eq!(network_name(424242), "Chain 424242");
    }

    #[test]
    fn dividend_consistency_requires_equal_lengths() {
        let ok = DividendSummary {
            months: vec![1, 2],
            yields_bp: vec![80, 85],
            cumulative_bp: vec![80, 165],
            events: vec!["a".into(), "b".into()],
        };
        assert!(ok.is_consistent());

        let bad = DividendSummary {
            events: vec!["a".into()],
            ..ok
        };
        assert!(!bad.is_consistent());
    }
}
