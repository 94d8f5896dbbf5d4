//! Market indicator retrieval: sources, TTL cache, and the snapshot bundle.

pub mod cache;
pub mod indicators;
pub mod source;

pub use cache::{IndicatorCache, DEFAULT_TTL};
pub use indicators::{Indicator, IndicatorSnapshot};
pub use source::{IndicatorSource, SimulatedSource};
