//! Error types for rangemark-recon.

use thiserror::Error;

use rangemark_client::ClientError;

/// All errors that can abort a scan before any candidate is produced.
///
/// Patch failures never appear here: they are recoverable per record and are
/// reported through [`crate::patch::PatchOutcome`] instead.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The page fetch failed; nothing was filtered or reported.
    #[error(transparent)]
    Fetch(#[from] ClientError),
}
