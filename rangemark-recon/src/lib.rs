//! # rangemark-recon
//!
//! The reconciliation engine: two-stage filtering, label derivation, the
//! scan pipeline, and the partial-failure-tolerant patch batch.
//!
//! Call [`scan::scan`] for the read side and [`patch::mark_all`] for the
//! opt-in write side. The state machine is small and linear:
//!
//! ```text
//! [unfiltered page] -> (marker match?) -> [candidate]
//!                   -> (state match?)  -> [target]
//!                   -> (patch requested?) -> [patched | reported-only]
//! ```

pub mod error;
pub mod filter;
pub mod label;
pub mod patch;
pub mod scan;

pub use error::ScanError;
pub use filter::{select_candidates, Candidate};
pub use patch::{mark_all, PatchOutcome, PatchSummary, RangePatcher};
pub use scan::{scan, RangeSource, ScanOptions, ScanReport};
