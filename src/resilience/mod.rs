//! Resilience layer: bounded reads and the ledger/local orchestrator.

pub mod fanout;
pub mod orchestrator;

pub use fanout::{bounded_read, FieldRead, FieldSource};
pub use orchestrator::{
    ProjectProfile, ResilienceOrchestrator, FIELD_TIMEOUT, PROBE_TIMEOUT,
};
