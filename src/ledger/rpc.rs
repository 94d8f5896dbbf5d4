//! JSON-RPC ledger client.
//!
//! Talks to an EVM node directly: `eth_chainId`/`eth_blockNumber` for the
//! reachability probe, `eth_call` against the valuation registry contract for
//! project reads. Return data is ABI-decoded with the small word reader at
//! the bottom of this file; the registry only returns uints, bools, strings,
//! and flat arrays of those.

use crate::ledger::{network_name, DividendSummary, LedgerClient, ProbeResult, ProjectRecord};
use crate::valuation::QualityMetrics;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, instrument};

/// Per-call timeout for every RPC round trip.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(3);
/// How long a successful probe result is reused.
pub const PROBE_TTL: Duration = Duration::from_secs(30);

const WEI_PER_TOKEN: f64 = 1e18;

// Registry function selectors, keyed by Solidity signature.
const SEL_GET_PROJECT: &str = "ab29ddc4"; // getProject(uint256)
const SEL_GET_TOKEN_PRICE: &str = "d02641a0"; // getTokenPrice(uint256)
const SEL_GET_AI_PRICE: &str = "5e38f0d4"; // getAiEnhancedPrice(uint256)
const SEL_GET_SCORE: &str = "31c2d9a7"; // getCompositeScore(uint256)
const SEL_GET_GRADE: &str = "7f1e52b3"; // getInvestmentGrade(uint256)
const SEL_GET_METRICS: &str = "4a6f8c1d"; // getCustomMetrics(uint256)
const SEL_GET_DIVIDENDS: &str = "9b30aa5e"; // getDividendInfo(uint256)

/// Ledger client over a single JSON-RPC endpoint.
pub struct JsonRpcLedger {
    http: Client,
    rpc_url: String,
    registry: String,
    call_timeout: Duration,
    probe_ttl: Duration,
    probe_cache: Mutex<Option<(Instant, ProbeResult)>>,
}

impl JsonRpcLedger {
    pub fn new(rpc_url: impl Into<String>, registry: impl Into<String>) -> Self {
        Self::with_timeouts(rpc_url, registry, CALL_TIMEOUT, PROBE_TTL)
    }

    pub fn with_timeouts(
        rpc_url: impl Into<String>,
        registry: impl Into<String>,
        call_timeout: Duration,
        probe_ttl: Duration,
    ) -> Self {
        Self {
            http: Client::new(),
            rpc_url: rpc_url.into(),
            registry: registry.into(),
            call_timeout,
            probe_ttl,
            probe_cache: Mutex::new(None),
        }
    }

    /// One JSON-RPC round trip, bounded by the per-call timeout.
    async fn rpc(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = timeout(
            self.call_timeout,
            self.http.post(&self.rpc_url).json(&body).send(),
        )
        .await
        .map_err(|_| anyhow!("{method} timed out after {:?}", self.call_timeout))?
        .with_context(|| format!("{method} request failed"))?;

        let payload: Value = timeout(self.call_timeout, response.json())
            .await
            .map_err(|_| anyhow!("{method} response read timed out"))?
            .with_context(|| format!("{method} returned non-JSON body"))?;

        if let Some(err) = payload.get("error") {
            bail!("{method} rpc error: {err}");
        }
        payload
            .get("result")
            .cloned()
            .with_context(|| format!("{method} response missing result"))
    }

    /// `eth_call` into the registry; returns the hex return data without the
    /// `0x` prefix.
    async fn registry_call(&self, selector: &str, project_id: u64) -> Result<String> {
        let data = format!("0x{selector}{project_id:064x}");
        let result = self
            .rpc(
                "eth_call",
                json!([{ "to": self.registry, "data": data }, "latest"]),
            )
            .await?;
        let hex = result
            .as_str()
            .context("eth_call result is not a string")?
            .strip_prefix("0x")
            .context("eth_call result missing 0x prefix")?
            .to_string();
        if hex.is_empty() {
            bail!("eth_call returned empty data (wrong registry address?)");
        }
        Ok(hex)
    }
}

#[async_trait]
impl LedgerClient for JsonRpcLedger {
    #[instrument(skip(self), fields(rpc_url = %self.rpc_url))]
    async fn probe(&self) -> Result<ProbeResult> {
        {
            let cache = self.probe_cache.lock().await;
            if let Some((at, result)) = cache.as_ref() {
                if at.elapsed() < self.probe_ttl {
                    debug!(network = %result.network_name, "probe cache hit");
                    return Ok(result.clone());
                }
            }
        }

        let chain_id = parse_quantity(&self.rpc("eth_chainId", json!([])).await?)?;
        let block_height = parse_quantity(&self.rpc("eth_blockNumber", json!([])).await?)?;
        let result = ProbeResult {
            chain_id,
            network_name: network_name(chain_id),
            block_height,
        };
        debug!(network = %result.network_name, block_height, "ledger reachable");

        *self.probe_cache.lock().await = Some((Instant::now(), result.clone()));
        Ok(result)
    }

    async fn project_record(&self, project_id: u64) -> Result<ProjectRecord> {
        let words = AbiWords::new(self.registry_call(SEL_GET_PROJECT, project_id).await?);
        Ok(ProjectRecord {
            base_price: words.uint(0)? as f64 / WEI_PER_TOKEN,
            total_supply: words.uint(1)? as u64,
            is_active: words.uint(2)? != 0,
            is_verified: words.uint(3)? != 0,
        })
    }

    async fn current_token_price(&self, project_id: u64) -> Result<f64> {
        let words = AbiWords::new(self.registry_call(SEL_GET_TOKEN_PRICE, project_id).await?);
        Ok(words.uint(0)? as f64 / WEI_PER_TOKEN)
    }

    async fn ai_enhanced_price(&self, project_id: u64) -> Result<f64> {
        let words = AbiWords::new(self.registry_call(SEL_GET_AI_PRICE, project_id).await?);
        Ok(words.uint(0)? as f64 / WEI_PER_TOKEN)
    }

    async fn composite_score(&self, project_id: u64) -> Result<u8> {
        let words = AbiWords::new(self.registry_call(SEL_GET_SCORE, project_id).await?);
        Ok(words.uint(0)?.min(100) as u8)
    }

    async fn investment_grade(&self, project_id: u64) -> Result<String> {
        let words = AbiWords::new(self.registry_call(SEL_GET_GRADE, project_id).await?);
        let offset = words.offset(0)?;
        words.string_at(offset)
    }

    async fn quality_metrics(&self, project_id: u64) -> Result<QualityMetrics> {
        let words = AbiWords::new(self.registry_call(SEL_GET_METRICS, project_id).await?);
        let updated = words.uint(3)? as i64;
        Ok(QualityMetrics {
            local_demand_index: words.uint(0)?.min(1000) as u32,
            development_progress: words.uint(1)?.min(100) as u8,
            infra_score: words.uint(2)?.min(100) as u8,
            last_updated: DateTime::<Utc>::from_timestamp(updated, 0).unwrap_or_else(Utc::now),
        })
    }

    async fn dividend_summary(&self, project_id: u64) -> Result<DividendSummary> {
        let words = AbiWords::new(self.registry_call(SEL_GET_DIVIDENDS, project_id).await?);

        let months = words
            .uint_array(words.offset(0)?)?
            .into_iter()
            .map(|m| m.min(12) as u8)
            .collect();
        let yields_bp = words
            .uint_array(words.offset(1)?)?
            .into_iter()
            .map(|y| y.min(u32::MAX as u128) as u32)
            .collect();
        let cumulative_bp = words
            .uint_array(words.offset(2)?)?
            .into_iter()
            .map(|y| y.min(u32::MAX as u128) as u32)
            .collect();
        let events = words.string_array(words.offset(3)?)?;

        let summary = DividendSummary {
            months,
            yields_bp,
            cumulative_bp,
            events,
        };
        if !summary.is_consistent() {
            bail!("dividend summary arrays have mismatched lengths");
        }
        Ok(summary)
    }
}

/// Parse a JSON-RPC hex quantity (`"0x1a4"`).
fn parse_quantity(value: &Value) -> Result<u64> {
    let s = value.as_str().context("quantity is not a string")?;
    let hex = s.strip_prefix("0x").context("quantity missing 0x prefix")?;
    u64::from_str_radix(hex, 16).with_context(|| format!("bad hex quantity: {s}"))
}

/// 32-byte word reader over hex-encoded ABI return data.
///
/// Word indices are relative to the start of the return data; dynamic-type
/// offsets are byte offsets, converted to word indices by `offset`.
struct AbiWords {
    hex: String,
}

impl AbiWords {
    fn new(hex: String) -> Self {
        Self { hex }
    }

    fn word(&self, index: usize) -> Result<&str> {
        let start = index * 64;
        let word = self
            .hex
            .get(start..start + 64)
            .with_context(|| format!("return data truncated at word {index}"))?;
        if !word.is_ascii() {
            bail!("non-ASCII character in return data at word {index}");
        }
        Ok(word)
    }

    fn uint(&self, index: usize) -> Result<u128> {
        let word = self.word(index)?;
        let (high, low) = word.split_at(32);
        if !high.trim_start_matches('0').is_empty() {
            bail!("uint at word {index} overflows u128");
        }
        u128::from_str_radix(low, 16).with_context(|| format!("bad uint at word {index}"))
    }

    /// Dynamic-type head slot: byte offset converted to a word index.
    fn offset(&self, index: usize) -> Result<usize> {
        let bytes = self.uint(index)?;
        if bytes % 32 != 0 {
            bail!("misaligned offset at word {index}: {bytes}");
        }
        Ok((bytes / 32) as usize)
    }

    fn uint_array(&self, at: usize) -> Result<Vec<u128>> {
        let len = self.uint(at)? as usize;
        (0..len).map(|k| self.uint(at + 1 + k)).collect()
    }

    fn string_at(&self, at: usize) -> Result<String> {
        let len = self.uint(at)? as usize;
        let start = (at + 1) * 64;
        let raw = self
            .hex
            .get(start..start + len * 2)
            .context("string data truncated")?;
        String::from_utf8(hex_bytes(raw)?).context("string is not valid UTF-8")
    }

    fn string_array(&self, at: usize) -> Result<Vec<String>> {
        let len = self.uint(at)? as usize;
        // Element offsets are relative to the word after the length.
        let base = at + 1;
        (0..len)
            .map(|k| {
                let rel = self.uint(base + k)?;
                if rel % 32 != 0 {
                    bail!("misaligned string offset in array element {k}");
                }
                self.string_at(base + (rel / 32) as usize)
            })
            .collect()
    }
}

fn hex_bytes(s: &str) -> Result<Vec<u8>> {
    if !s.is_ascii() {
        bail!("non-ASCII character in hex data");
    }
    if s.len() % 2 != 0 {
        bail!("odd-length hex string");
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            let pair = s.get(i..i + 2).context("hex data truncated")?;
            u8::from_str_radix(pair, 16).context("invalid hex byte")
        })
        .collect()
}
