//! Caller-visible validation errors.
//!
//! Internal plumbing uses `anyhow`; these are the two rejections the engine
//! surfaces to callers before any pricing runs.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValuationError {
    /// Weight triples must sum to exactly 100 percent.
    #[error("invalid weight configuration: oracle {oracle} + custom {custom} + base {base} = {sum}, expected 100")]
    InvalidWeightConfiguration {
        oracle: u8,
        custom: u8,
        base: u8,
        sum: u16,
    },

    /// Forecast fields must stay within their documented ranges.
    #[error("malformed forecast signal: {reason}")]
    MalformedForecastSignal { reason: String },
}
