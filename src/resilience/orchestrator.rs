//! Ledger-vs-local arbitration.
//!
//! The orchestrator produces one `ProjectValuation` per call. Ledger access
//! is optional and best-effort: a failed reachability probe drops the whole
//! run to local computation, and a reachable ledger still gets per-field
//! substitution for any read that errors or exceeds its deadline. No error
//! from the ledger side ever escapes this module; the only caller-visible
//! failures are input validation.

use crate::error::ValuationError;
use crate::ledger::{LedgerClient, ProjectRecord};
use crate::market::{IndicatorCache, IndicatorSnapshot};
use crate::report::{
    ConnectionStatus, DataSource, DividendData, ProjectValuation, Provenance,
};
use crate::resilience::fanout::bounded_read;
use crate::valuation::{
    apply_forecast, composite_score, simulate_yields, strategy_price, ForecastSignal,
    InvestmentGrade, LocationBucket, PricingStrategy, QualityMetrics, ScoreBreakdown, SizeTier,
    ValuationInputs, YieldPoint,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

/// Default bound on the reachability probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);
/// Default bound on each individual ledger field read.
pub const FIELD_TIMEOUT: Duration = Duration::from_secs(3);

/// Static description of the project being valued.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectProfile {
    pub id: u64,
    pub name: String,
    pub base_price: f64,
    pub location: LocationBucket,
    /// Display name substituted into generated event text.
    pub location_name: String,
    pub project_type: String,
    pub size: SizeTier,
    /// Locally known metrics, used when the ledger copy is unavailable.
    pub metrics: QualityMetrics,
    pub strategy: PricingStrategy,
}

/// Everything the local pipeline produces for one run.
struct LocalValuation {
    snapshot: IndicatorSnapshot,
    breakdown: ScoreBreakdown,
    grade: InvestmentGrade,
    price: f64,
    enhanced_price: f64,
    series: Vec<YieldPoint>,
}

pub struct ResilienceOrchestrator {
    ledger: Option<Arc<dyn LedgerClient>>,
    indicators: Arc<IndicatorCache>,
    probe_timeout: Duration,
    field_timeout: Duration,
}

impl ResilienceOrchestrator {
    /// `ledger: None` means ledger access is configuration-disabled; every
    /// run goes straight to local computation.
    pub fn new(ledger: Option<Arc<dyn LedgerClient>>, indicators: Arc<IndicatorCache>) -> Self {
        Self {
            ledger,
            indicators,
            probe_timeout: PROBE_TIMEOUT,
            field_timeout: FIELD_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, probe: Duration, field: Duration) -> Self {
        self.probe_timeout = probe;
        self.field_timeout = field;
        self
    }

    /// Produce a best-effort valuation for one project.
    ///
    /// Never blocks past the configured timeouts and never fails on ledger
    /// trouble; the only errors are malformed caller inputs.
    #[instrument(skip(self, profile, forecast), fields(project = profile.id))]
    pub async fn valuate(
        &self,
        profile: &ProjectProfile,
        forecast: Option<&ForecastSignal>,
    ) -> Result<ProjectValuation, ValuationError> {
        if let Some(signal) = forecast {
            signal.validate()?;
        }

        let local = self.local_pipeline(profile, forecast).await;

        let ledger = match &self.ledger {
            None => {
                info!("ledger disabled, serving local valuation");
                return Ok(self.local_valuation(profile, &local, ConnectionStatus::Disabled, None));
            }
            Some(ledger) => Arc::clone(ledger),
        };

        match timeout(self.probe_timeout, ledger.probe()).await {
            Ok(Ok(probe)) => {
                info!(network = %probe.network_name, height = probe.block_height, "ledger reachable");
            }
            Ok(Err(e)) => {
                warn!(error = %e, "ledger probe failed, dropping to local computation");
                return Ok(self.local_valuation(
                    profile,
                    &local,
                    ConnectionStatus::Disconnected,
                    Some(remediation_hint(&e.to_string())),
                ));
            }
            Err(_) => {
                warn!(timeout = ?self.probe_timeout, "ledger probe timed out, dropping to local computation");
                return Ok(self.local_valuation(
                    profile,
                    &local,
                    ConnectionStatus::Disconnected,
                    Some(remediation_hint(&format!(
                        "probe exceeded {:?}",
                        self.probe_timeout
                    ))),
                ));
            }
        }

        let id = profile.id;
        let dl = self.field_timeout;
        let (record, price, enhanced, score, grade, metrics, dividends) = tokio::join!(
            bounded_read("projectRecord", dl, ledger.project_record(id), || {
                ProjectRecord {
                    base_price: profile.base_price,
                    total_supply: 0,
                    is_active: true,
                    is_verified: false,
                }
            }),
            bounded_read("tokenPrice", dl, ledger.current_token_price(id), || {
                local.price
            }),
            bounded_read("aiEnhancedPrice", dl, ledger.ai_enhanced_price(id), || {
                local.enhanced_price
            }),
            bounded_read("compositeScore", dl, ledger.composite_score(id), || {
                local.breakdown.composite_score
            }),
            bounded_read(
                "investmentGrade",
                dl,
                async { ledger.investment_grade(id).await.and_then(|s| s.parse()) },
                || local.grade,
            ),
            bounded_read("qualityMetrics", dl, ledger.quality_metrics(id), || {
                profile.metrics
            }),
            bounded_read(
                "dividendSummary",
                dl,
                async {
                    ledger
                        .dividend_summary(id)
                        .await
                        .map(|s| DividendData::from_ledger(&s))
                },
                || DividendData::from_simulation(&local.series),
            ),
        );

        let any_substituted = record.substituted()
            || price.substituted()
            || enhanced.substituted()
            || score.substituted()
            || grade.substituted()
            || metrics.substituted()
            || dividends.substituted();
        let data_source = if any_substituted {
            DataSource::Fallback
        } else {
            DataSource::Ledger
        };

        Ok(ProjectValuation {
            project_id: profile.id,
            base_price: record.value.base_price,
            current_price: price.value,
            ai_enhanced_price: enhanced.value,
            custom_score: score.value,
            investment_grade: grade.value,
            custom_metrics: metrics.value,
            dividend_data: dividends.value,
            provenance: Provenance {
                connection_status: ConnectionStatus::Connected,
                data_source,
                timestamp: Utc::now(),
                troubleshooting_tip: None,
            },
        })
    }

    /// Run the full local pipeline once; its outputs double as the per-field
    /// substitutes when the ledger path degrades.
    async fn local_pipeline(
        &self,
        profile: &ProjectProfile,
        forecast: Option<&ForecastSignal>,
    ) -> LocalValuation {
        let snapshot = self.indicators.get_all().await;
        let breakdown = composite_score(&snapshot, profile.location, profile.size);
        let grade = InvestmentGrade::from_score(breakdown.composite_score);

        let inputs = ValuationInputs {
            base_price: profile.base_price,
            snapshot: &snapshot,
            composite_score: breakdown.composite_score,
            size: profile.size,
            oracle_price: None,
            now: Utc::now(),
        };
        let price = strategy_price(profile.strategy, &inputs);
        let enhanced_price = match forecast {
            Some(signal) => apply_forecast(price, signal),
            None => price,
        };

        let series = simulate_yields(
            &mut rand::thread_rng(),
            &snapshot,
            breakdown.composite_score,
            &profile.location_name,
            &profile.project_type,
        );

        LocalValuation {
            snapshot,
            breakdown,
            grade,
            price,
            enhanced_price,
            series,
        }
    }

    fn local_valuation(
        &self,
        profile: &ProjectProfile,
        local: &LocalValuation,
        connection_status: ConnectionStatus,
        troubleshooting_tip: Option<String>,
    ) -> ProjectValuation {
        ProjectValuation {
            project_id: profile.id,
            base_price: profile.base_price,
            current_price: local.price,
            ai_enhanced_price: local.enhanced_price,
            custom_score: local.breakdown.composite_score,
            investment_grade: local.grade,
            custom_metrics: profile.metrics,
            dividend_data: DividendData::from_simulation(&local.series),
            provenance: Provenance {
                connection_status,
                data_source: DataSource::Calculation,
                timestamp: local.snapshot.captured_at,
                troubleshooting_tip,
            },
        }
    }
}

fn remediation_hint(cause: &str) -> String {
    format!(
        "Ledger unreachable ({cause}). Check that the node is running and the RPC URL \
         and chain id are correct; for local development start a devnet first."
    )
}
