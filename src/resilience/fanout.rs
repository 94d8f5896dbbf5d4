//! Bounded per-field reads with local substitution.
//!
//! Every ledger field read follows the same shape: race the read against a
//! timer, and on error or timeout substitute a locally computed value instead
//! of failing. Reads composed this way never resolve to an error, so joining
//! any number of them gives all-settled semantics for free.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

/// Where one field's value ended up coming from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Ledger,
    Substituted,
}

/// A resolved field read.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRead<T> {
    pub value: T,
    pub source: FieldSource,
}

impl<T> FieldRead<T> {
    pub fn substituted(&self) -> bool {
        self.source == FieldSource::Substituted
    }
}

/// Race one read against `deadline`; on timeout or error, substitute.
///
/// The substitute closure is only invoked when needed, so an expensive local
/// recomputation costs nothing on the happy path.
pub async fn bounded_read<T, Fut, F>(
    field: &'static str,
    deadline: Duration,
    read: Fut,
    substitute: F,
) -> FieldRead<T>
where
    Fut: Future<Output = Result<T>>,
    F: FnOnce() -> T,
{
    match timeout(deadline, read).await {
        Ok(Ok(value)) => FieldRead {
            value,
            source: FieldSource::Ledger,
        },
        Ok(Err(e)) => {
            warn!(field, error = %e, "ledger field read failed, substituting local value");
            FieldRead {
                value: substitute(),
                source: FieldSource::Substituted,
            }
        }
        Err(_) => {
            warn!(field, ?deadline, "ledger field read timed out, substituting local value");
            FieldRead {
                value: substitute(),
                source: FieldSource::Substituted,
            }
        }
    }
}
