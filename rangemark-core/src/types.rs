//! Domain types for the rangemark reconciler.
//!
//! Everything here is a read-side view of records owned by the remote
//! inventory service. The tool never invents or deletes records; it only
//! reads them and, when asked, flips one field on records it did not create.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page size requested from the server when the caller does not override it.
pub const DEFAULT_PAGE_LIMIT: u32 = 1000;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a remote IP range record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Marker
// ---------------------------------------------------------------------------

/// The management marker: a literal substring embedded in a record's
/// description to claim it as managed by this tool.
///
/// Matching is case-sensitive, literal containment, never a pattern. A record
/// whose description lacks the marker is invisible to every later stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker(String);

impl Marker {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Literal, case-sensitive containment check.
    pub fn is_present_in(&self, description: &str) -> bool {
        description.contains(&self.0)
    }

    /// The marker's leading delimiter: its first whitespace-delimited token
    /// (`"//"` for the default marker). Label derivation splits on this.
    pub fn leading_delimiter(&self) -> &str {
        self.0.split_whitespace().next().unwrap_or(&self.0)
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MARKER)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One remote IP range record, as returned by the inventory API.
///
/// Unknown wire fields are ignored on deserialization. `mark_populated` is
/// merge-as-falsy: absent, `null`, and `false` all read as "not populated",
/// and a missing field is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRange {
    pub id: RecordId,
    pub start_address: String,
    pub end_address: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mark_populated: Option<bool>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl IpRange {
    /// Description text, empty when the server sent none.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Whether the record is already reconciled. Absent/null/false are all
    /// falsy.
    pub fn is_populated(&self) -> bool {
        self.mark_populated.unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Page window
// ---------------------------------------------------------------------------

/// The `(limit, offset)` pair bounding one server-side fetch.
///
/// The server, not the client, applies both bounds. No cursor state persists
/// between invocations; each run is stateless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u32,
    pub offset: u32,
}

impl PageWindow {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// True when a fetched page filled the requested limit exactly, meaning
    /// more matching records may exist past this window.
    pub fn saturated_by(&self, fetched: usize) -> bool {
        fetched as u64 == u64::from(self.limit)
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn range_json(extra: &str) -> String {
        format!(
            r#"{{
                "id": 42,
                "url": "https://inventory.example/api/ipam/ip-ranges/42/",
                "display": "10.0.0.1/24",
                "start_address": "10.0.0.1/24",
                "end_address": "10.0.0.254/24",
                "size": 254
                {extra}
            }}"#
        )
    }

    #[test]
    fn record_id_display() {
        assert_eq!(RecordId::from(7).to_string(), "7");
    }

    #[test]
    fn deserialize_ignores_unknown_fields_and_defaults_missing_ones() {
        let range: IpRange = serde_json::from_str(&range_json("")).expect("deserialize");
        assert_eq!(range.id, RecordId(42));
        assert_eq!(range.description(), "");
        assert!(!range.is_populated());
        assert!(range.last_updated.is_none());
    }

    #[test]
    fn mark_populated_null_false_and_true() {
        let null: IpRange =
            serde_json::from_str(&range_json(r#", "mark_populated": null"#)).expect("null");
        assert!(!null.is_populated());

        let falsy: IpRange =
            serde_json::from_str(&range_json(r#", "mark_populated": false"#)).expect("false");
        assert!(!falsy.is_populated());

        let truthy: IpRange =
            serde_json::from_str(&range_json(r#", "mark_populated": true"#)).expect("true");
        assert!(truthy.is_populated());
    }

    #[test]
    fn marker_containment_is_literal_and_case_sensitive() {
        let marker = Marker::new("// managed by rangemark");
        assert!(marker.is_present_in("3.0.1.0/24 // managed by rangemark"));
        assert!(!marker.is_present_in("3.0.1.0/24 // Managed By Rangemark"));
        assert!(!marker.is_present_in("plain text"));
    }

    #[test]
    fn marker_leading_delimiter() {
        assert_eq!(Marker::default().leading_delimiter(), "//");
        assert_eq!(Marker::new("#claimed").leading_delimiter(), "#claimed");
    }

    #[test]
    fn page_window_saturation() {
        let window = PageWindow::new(2, 0);
        assert!(window.saturated_by(2));
        assert!(!window.saturated_by(1));
        assert!(!window.saturated_by(3));
    }
}
