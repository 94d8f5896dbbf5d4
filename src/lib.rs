//! Valuation oracle for real-asset-backed project tokens.
//!
//! Fuses three signal sources into one per-project valuation: external market
//! indicators, project-specific quality metrics, and an optional analyst
//! forecast. The on-ledger registry is the authoritative source when it is
//! reachable; the local pipeline keeps producing usable numbers when it is
//! not, and every result is tagged with its provenance.

pub mod analysis;
pub mod config;
pub mod error;
pub mod ledger;
pub mod market;
pub mod report;
pub mod resilience;
pub mod valuation;

// Re-export main types for convenience
pub use analysis::AnalystDigest;
pub use config::OracleConfig;
pub use error::ValuationError;
pub use ledger::LedgerClient;
pub use market::{IndicatorCache, SimulatedSource};
pub use report::ProjectValuation;
pub use resilience::{ProjectProfile, ResilienceOrchestrator};
pub use valuation::{ForecastSignal, InvestmentGrade, PricingStrategy, ValuationWeights};
