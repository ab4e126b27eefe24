//! Partial-failure-tolerant patch batch.
//!
//! Each candidate is patched independently and sequentially. A failure is
//! caught at the call site, recorded as a tagged outcome, and the batch
//! moves on: one bad record must not abort the rest. The whole batch is
//! idempotent, so a re-run retries only what the state filter still matches.

use rangemark_core::RecordId;

use rangemark_client::{ClientError, InventoryClient};

use crate::filter::Candidate;

/// Where patches go. Seam for tests; the production implementation is
/// [`InventoryClient`].
pub trait RangePatcher {
    fn mark_populated(&self, id: RecordId) -> Result<(), ClientError>;
}

impl RangePatcher for InventoryClient {
    fn mark_populated(&self, id: RecordId) -> Result<(), ClientError> {
        InventoryClient::mark_populated(self, id)
    }
}

/// Outcome of an individual patch attempt.
#[derive(Debug)]
pub enum PatchOutcome {
    /// The update call succeeded (including the no-op case of an
    /// already-populated record).
    Patched { id: RecordId },
    /// The update call failed; the error is kept so callers can branch on
    /// its variant rather than its message.
    Failed { id: RecordId, error: ClientError },
}

impl PatchOutcome {
    pub fn id(&self) -> RecordId {
        match self {
            PatchOutcome::Patched { id } | PatchOutcome::Failed { id, .. } => *id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PatchOutcome::Patched { .. })
    }
}

/// Per-record outcomes plus tallies for one patch batch.
#[derive(Debug, Default)]
pub struct PatchSummary {
    pub outcomes: Vec<PatchOutcome>,
}

impl PatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Patch every candidate, never aborting on an individual failure.
pub fn mark_all<P: RangePatcher>(patcher: &P, candidates: &[Candidate]) -> PatchSummary {
    let mut summary = PatchSummary::default();
    for candidate in candidates {
        let id = candidate.range.id;
        match patcher.mark_populated(id) {
            Ok(()) => summary.outcomes.push(PatchOutcome::Patched { id }),
            Err(error) => {
                tracing::warn!("patch failed for ip-range {id}: {error}");
                summary.outcomes.push(PatchOutcome::Failed { id, error });
            }
        }
    }
    summary
}
