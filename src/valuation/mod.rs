//! Local valuation pipeline: scoring, grading, pricing, and the yield/news
//! simulation.

pub mod composer;
pub mod grade;
pub mod metrics;
pub mod news;
pub mod scorer;
pub mod sim;

pub use composer::{
    apply_forecast, compose_price, strategy_price, ForecastSignal, PricingStrategy,
    ValuationInputs, ValuationWeights,
};
pub use grade::InvestmentGrade;
pub use metrics::{LocationBucket, QualityMetrics, SizeTier};
pub use news::{generate_event, ImpactClass, NewsEvent};
pub use scorer::{composite_score, ScoreBreakdown};
pub use sim::{simulate_yields, YieldPoint};
