//! Configuration loading and logging setup.

use crate::resilience::ProjectProfile;
use crate::valuation::{
    LocationBucket, PricingStrategy, QualityMetrics, SizeTier, ValuationWeights,
};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Top-level configuration for the oracle process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// When false, the ledger is never contacted and every valuation is
    /// computed locally.
    pub ledger_enabled: bool,
    pub rpc_url: String,
    pub registry_address: String,
    pub poll_interval_secs: u64,
    pub probe_timeout_secs: u64,
    pub field_timeout_secs: u64,
    pub indicator_ttl_secs: u64,
    pub log_level: String,
    /// Optional analyst note; when present its digest feeds the forecast gate.
    pub analyst_note_path: Option<String>,
    pub projects: Vec<ProjectConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub id: u64,
    pub name: String,
    pub base_price: f64,
    pub location: LocationBucket,
    pub location_name: String,
    pub project_type: String,
    pub size: SizeTier,
    pub strategy: StrategyConfig,
    /// Required when `strategy = "weighted"`.
    pub weights: Option<WeightsConfig>,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyConfig {
    Hybrid,
    Weighted,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightsConfig {
    pub oracle: u8,
    pub custom: u8,
    pub base: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub local_demand_index: u32,
    pub development_progress: u8,
    pub infra_score: u8,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            ledger_enabled: true,
            rpc_url: "http://127.0.0.1:8545".to_string(),
            registry_address: "0x0000000000000000000000000000000000000000".to_string(),
            poll_interval_secs: 60,
            probe_timeout_secs: 3,
            field_timeout_secs: 3,
            indicator_ttl_secs: 300,
            log_level: "info".to_string(),
            analyst_note_path: None,
            projects: Vec::new(),
        }
    }
}

impl OracleConfig {
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.as_ref().display()))?;
        let mut config: OracleConfig = toml::from_str(&contents)?;

        // Environment overrides, mainly for deployment-specific endpoints.
        if let Ok(rpc_url) = std::env::var("LEDGER_RPC_URL") {
            config.rpc_url = rpc_url;
        }
        if let Ok(registry) = std::env::var("LEDGER_REGISTRY_ADDRESS") {
            config.registry_address = registry;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            bail!("rpc_url must be an http(s) endpoint: {}", self.rpc_url);
        }
        if self.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be positive");
        }
        for project in &self.projects {
            if project.base_price <= 0.0 || !project.base_price.is_finite() {
                bail!(
                    "project {} has invalid base_price {}",
                    project.id,
                    project.base_price
                );
            }
            if project.strategy == StrategyConfig::Weighted && project.weights.is_none() {
                bail!("project {} uses the weighted strategy but has no weights", project.id);
            }
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level.clone()));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

impl ProjectConfig {
    pub fn to_profile(&self) -> Result<ProjectProfile> {
        let strategy = match self.strategy {
            StrategyConfig::Hybrid => PricingStrategy::Hybrid,
            StrategyConfig::Weighted => {
                let w = self
                    .weights
                    .with_context(|| format!("project {} missing weights", self.id))?;
                PricingStrategy::Weighted(ValuationWeights::new(w.oracle, w.custom, w.base)?)
            }
        };

        Ok(ProjectProfile {
            id: self.id,
            name: self.name.clone(),
            base_price: self.base_price,
            location: self.location,
            location_name: self.location_name.clone(),
            project_type: self.project_type.clone(),
            size: self.size,
            metrics: QualityMetrics::new(
                self.metrics.local_demand_index,
                self.metrics.development_progress,
                self.metrics.infra_score,
            ),
            strategy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project(strategy: StrategyConfig, weights: Option<WeightsConfig>) -> ProjectConfig {
        ProjectConfig {
            id: 1,
            name: "Riverside Residences".to_string(),
            base_price: 0.08,
            location: LocationBucket::PrimaryMetro,
            location_name: "Riverside".to_string(),
            project_type: "residential".to_string(),
            size: SizeTier::Mid,
            strategy,
            weights,
            metrics: MetricsConfig {
                local_demand_index: 750,
                development_progress: 65,
                infra_score: 85,
            },
        }
    }

    #[test]
    fn toml_round_trips() {
        let mut config = OracleConfig::default();
        config.projects.push(sample_project(StrategyConfig::Hybrid, None));
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: OracleConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.projects.len(), 1);
        assert_eq!(parsed.rpc_url, config.rpc_url);
    }

    #[test]
    fn weighted_strategy_requires_weights() {
        let mut config = OracleConfig::default();
        config.projects.push(sample_project(StrategyConfig::Weighted, None));
        assert!(config.validate().is_err());

        config.projects[0].weights = Some(WeightsConfig {
            oracle: 30,
            custom: 50,
            base: 20,
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bad_weight_sum_fails_profile_conversion() {
        let project = sample_project(
            StrategyConfig::Weighted,
            Some(WeightsConfig {
                oracle: 60,
                custom: 60,
                base: 0,
            }),
        );
        assert!(project.to_profile().is_err());
    }

    #[test]
    fn non_http_rpc_url_is_rejected() {
        let config = OracleConfig {
            rpc_url: "ws://localhost:8545".to_string(),
            ..OracleConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
