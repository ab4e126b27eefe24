//! Label derivation.
//!
//! The marker convention puts free-form metadata before the marker, e.g.
//! `"3.0.1.0/24 // managed by rangemark"`. The label is the trimmed portion
//! before the first occurrence of the marker's leading delimiter.
//!
//! Labels are presentational only and must never be used as a matching key.
//! All knowledge of the marker's shape stays in this one function so a format
//! change touches one place.

use rangemark_core::Marker;

/// Derive the human-readable label for a description known to carry `marker`.
pub fn derive(description: &str, marker: &Marker) -> String {
    match description.split_once(marker.leading_delimiter()) {
        Some((head, _)) => head.trim().to_string(),
        None => description.trim().to_string(),
    }
}
