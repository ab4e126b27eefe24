//! Human and JSON reporting.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use rangemark_recon::{PatchOutcome, PatchSummary, ScanReport};

// ---------------------------------------------------------------------------
// Human output
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct RangeTableRow {
    #[tabled(rename = "id")]
    id: u64,
    #[tabled(rename = "range")]
    range: String,
    #[tabled(rename = "label")]
    label: String,
    #[tabled(rename = "populated")]
    populated: String,
    #[tabled(rename = "updated")]
    updated: String,
}

/// Print the scan report: truncation warning, match list, state values.
pub fn print_report(report: &ScanReport) {
    if report.truncated {
        let next_offset = report.window.offset + report.window.limit;
        println!(
            "{}",
            format!(
                "Warning: the page is full ({} records fetched, limit {}); \
                 re-run with --offset {next_offset} to continue.",
                report.fetched, report.window.limit
            )
            .yellow()
            .bold()
        );
    }

    if report.candidates.is_empty() {
        println!("No matching IP ranges found.");
        return;
    }

    println!(
        "Showing {} matching IP range(s) (offset={}, limit={}):",
        report.candidates.len(),
        report.window.offset,
        report.window.limit
    );

    let rows: Vec<RangeTableRow> = report
        .candidates
        .iter()
        .map(|candidate| RangeTableRow {
            id: candidate.range.id.0,
            range: format!(
                "{} - {}",
                candidate.range.start_address, candidate.range.end_address
            ),
            label: candidate.label.clone(),
            populated: if candidate.range.is_populated() {
                "yes".green().to_string()
            } else {
                "no".yellow().to_string()
            },
            updated: candidate
                .range
                .last_updated
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

/// Print per-record patch outcomes and the closing tally.
pub fn print_patch(summary: &PatchSummary) {
    for outcome in &summary.outcomes {
        match outcome {
            PatchOutcome::Patched { id } => {
                println!("  {} Patched IP range {id}", "✓".green().bold());
            }
            PatchOutcome::Failed { id, error } => {
                println!(
                    "  {} Failed to patch IP range {id}: {error}",
                    "✗".red().bold()
                );
            }
        }
    }
    println!(
        "Done: {} patched, {} failed.",
        summary.succeeded(),
        summary.failed()
    );
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ReportJson {
    summary: SummaryJson,
    ranges: Vec<RangeJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    patch: Option<PatchJson>,
}

#[derive(Serialize)]
struct SummaryJson {
    fetched: usize,
    matched: usize,
    limit: u32,
    offset: u32,
    truncated: bool,
}

#[derive(Serialize)]
struct RangeJson {
    id: u64,
    start_address: String,
    end_address: String,
    label: String,
    populated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<String>,
}

#[derive(Serialize)]
struct PatchJson {
    succeeded: usize,
    failed: usize,
    outcomes: Vec<PatchOutcomeJson>,
}

#[derive(Serialize)]
struct PatchOutcomeJson {
    id: u64,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Print the whole run as one JSON document.
pub fn print_json(report: &ScanReport, patch: Option<&PatchSummary>) -> Result<()> {
    let payload = ReportJson {
        summary: SummaryJson {
            fetched: report.fetched,
            matched: report.candidates.len(),
            limit: report.window.limit,
            offset: report.window.offset,
            truncated: report.truncated,
        },
        ranges: report
            .candidates
            .iter()
            .map(|candidate| RangeJson {
                id: candidate.range.id.0,
                start_address: candidate.range.start_address.clone(),
                end_address: candidate.range.end_address.clone(),
                label: candidate.label.clone(),
                populated: candidate.range.is_populated(),
                last_updated: candidate.range.last_updated.map(|at| at.to_rfc3339()),
            })
            .collect(),
        patch: patch.map(|summary| PatchJson {
            succeeded: summary.succeeded(),
            failed: summary.failed(),
            outcomes: summary
                .outcomes
                .iter()
                .map(|outcome| match outcome {
                    PatchOutcome::Patched { id } => PatchOutcomeJson {
                        id: id.0,
                        status: "patched".to_string(),
                        error: None,
                    },
                    PatchOutcome::Failed { id, error } => PatchOutcomeJson {
                        id: id.0,
                        status: "failed".to_string(),
                        error: Some(error.to_string()),
                    },
                })
                .collect(),
        }),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize report JSON")?
    );
    Ok(())
}
