//! Scan pipeline entrypoint.
//!
//! One scan issues exactly one fetch for the caller's page window, applies
//! the two-stage filter, and reports whether the page was saturated. There
//! is no internal loop across pages: pagination stays caller-driven.

use rangemark_core::{IpRange, Marker, PageWindow};

use rangemark_client::{ClientError, InventoryClient};

use crate::error::ScanError;
use crate::filter::{select_candidates, Candidate};

/// Where scan pages come from. Seam for tests; the production implementation
/// is [`InventoryClient`].
pub trait RangeSource {
    fn fetch_page(&self, window: PageWindow) -> Result<Vec<IpRange>, ClientError>;
}

impl RangeSource for InventoryClient {
    fn fetch_page(&self, window: PageWindow) -> Result<Vec<IpRange>, ClientError> {
        self.fetch_ip_ranges(window)
    }
}

/// Caller-selected scan behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    pub window: PageWindow,
    /// Enable the state stage: keep only records whose populated flag is
    /// still falsy.
    pub not_populated_only: bool,
}

/// Outcome of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Surviving records with derived labels, in server order.
    pub candidates: Vec<Candidate>,
    /// Raw record count the server returned for the window, pre-filter.
    pub fetched: usize,
    /// The window this scan used.
    pub window: PageWindow,
    /// True when the fetched count filled the limit exactly; more matching
    /// records may exist past this window and the caller must re-run with a
    /// larger offset to see them.
    pub truncated: bool,
}

/// Run the scan: fetch one page, filter, derive labels.
pub fn scan<S: RangeSource>(
    source: &S,
    marker: &Marker,
    options: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    let page = source.fetch_page(options.window)?;
    let fetched = page.len();
    let truncated = options.window.saturated_by(fetched);
    let candidates = select_candidates(page, marker, options.not_populated_only);
    tracing::info!(
        "scan kept {} of {fetched} fetched record(s) (limit={}, offset={})",
        candidates.len(),
        options.window.limit,
        options.window.offset
    );

    Ok(ScanReport {
        candidates,
        fetched,
        window: options.window,
        truncated,
    })
}
