//! Two-stage candidate selection.
//!
//! Stage order is load-bearing:
//! 1. Marker stage: the authority boundary. Records without the marker are
//!    invisible to everything downstream, reporting included.
//! 2. State stage (optional): the work-filter. Keeps only records whose
//!    populated flag is still falsy.
//!
//! The stages compose by intersection, marker first.

use rangemark_core::{IpRange, Marker};

use crate::label;

/// A record that survived filtering, paired with its derived display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub range: IpRange,
    pub label: String,
}

/// Apply the two-stage filter and derive labels for the survivors.
///
/// Input order is preserved.
pub fn select_candidates(
    ranges: Vec<IpRange>,
    marker: &Marker,
    not_populated_only: bool,
) -> Vec<Candidate> {
    ranges
        .into_iter()
        .filter(|range| marker.is_present_in(range.description()))
        .filter(|range| !not_populated_only || !range.is_populated())
        .map(|range| Candidate {
            label: label::derive(range.description(), marker),
            range,
        })
        .collect()
}
