//! Main entry point for the valuation oracle.
//! Slim poll loop: load config, wire the pipeline, revalue on an interval.

use anyhow::Result;
use rwa_oracle::analysis::AnalystDigest;
use rwa_oracle::config::OracleConfig;
use rwa_oracle::ledger::rpc::JsonRpcLedger;
use rwa_oracle::ledger::LedgerClient;
use rwa_oracle::market::{IndicatorCache, SimulatedSource};
use rwa_oracle::resilience::{ProjectProfile, ResilienceOrchestrator};
use rwa_oracle::valuation::ForecastSignal;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match OracleConfig::from_toml_file("config.toml") {
        Ok(c) => {
            c.init_logging();
            tracing::info!("Loaded config from config.toml");
            c
        }
        Err(e) => {
            let c = OracleConfig::default();
            c.init_logging();
            tracing::info!(error = %e, "Using default config");
            c
        }
    };

    tracing::info!("Starting valuation oracle");

    let source = Arc::new(SimulatedSource::new());
    let indicators = Arc::new(IndicatorCache::with_ttl(
        source,
        Duration::from_secs(config.indicator_ttl_secs),
    ));

    let ledger: Option<Arc<dyn LedgerClient>> = if config.ledger_enabled {
        Some(Arc::new(JsonRpcLedger::new(
            config.rpc_url.clone(),
            config.registry_address.clone(),
        )))
    } else {
        tracing::info!("Ledger access disabled by configuration");
        None
    };

    let orchestrator = ResilienceOrchestrator::new(ledger, indicators).with_timeouts(
        Duration::from_secs(config.probe_timeout_secs),
        Duration::from_secs(config.field_timeout_secs),
    );

    let profiles: Vec<ProjectProfile> = config
        .projects
        .iter()
        .map(|p| p.to_profile())
        .collect::<Result<_>>()?;
    if profiles.is_empty() {
        tracing::warn!("No projects configured; nothing to value");
    }

    let mut interval = tokio::time::interval(Duration::from_secs(config.poll_interval_secs));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let forecasts = load_forecasts(&config, &profiles);
                for (profile, forecast) in profiles.iter().zip(&forecasts) {
                    match orchestrator.valuate(profile, forecast.as_ref()).await {
                        Ok(valuation) => match serde_json::to_string(&valuation) {
                            Ok(json) => tracing::info!(project = %profile.name, %json, "valuation"),
                            Err(e) => tracing::error!(project = %profile.name, error = %e, "serialization failed"),
                        },
                        Err(e) => {
                            tracing::error!(project = %profile.name, error = %e, "valuation rejected");
                        }
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down gracefully");
                break;
            }
        }
    }

    Ok(())
}

/// Re-read the analyst note each cycle; a note is optional and a malformed
/// one still produces a usable default digest.
fn load_forecasts(
    config: &OracleConfig,
    profiles: &[ProjectProfile],
) -> Vec<Option<ForecastSignal>> {
    let digest = config.analyst_note_path.as_ref().and_then(|path| {
        match std::fs::read_to_string(path) {
            Ok(text) => Some(AnalystDigest::from_text(&text)),
            Err(e) => {
                tracing::debug!(path, error = %e, "analyst note not readable");
                None
            }
        }
    });

    profiles
        .iter()
        .map(|p| digest.as_ref().map(|d| d.to_forecast(p.base_price)))
        .collect()
}
