//! rangemark — marker-based IP range reconciliation CLI.
//!
//! Scans one page of a network inventory's IP ranges, keeps the records
//! whose description carries the management marker, reports them, and
//! optionally patches their populated flag.
//!
//! # Usage
//!
//! ```text
//! rangemark [--limit <n>] [--offset <n>] [--not-populated-only]
//!           [--mark-populated] [--json]
//! ```
//!
//! Endpoint, token, marker, trust anchor, timeout, and retries come from
//! `RANGEMARK_*` environment variables; see `rangemark_core::config`.

mod output;

use anyhow::{Context, Result};
use clap::Parser;

use rangemark_client::InventoryClient;
use rangemark_core::{Config, PageWindow, DEFAULT_PAGE_LIMIT};
use rangemark_recon::{mark_all, scan, ScanOptions};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "rangemark",
    version,
    about = "List marker-managed IP ranges in a network inventory and optionally mark them as populated",
    long_about = None,
)]
struct Cli {
    /// Patch the populated flag of every matching range instead of only
    /// reporting.
    #[arg(long)]
    mark_populated: bool,

    /// Page size requested from the server.
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT, value_parser = clap::value_parser!(u32).range(1..))]
    limit: u32,

    /// Server-side skip count applied before the page starts.
    #[arg(long, default_value_t = 0)]
    offset: u32,

    /// Only include ranges whose populated flag is still unset.
    #[arg(long)]
    not_populated_only: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    Cli::parse().run()
}

impl Cli {
    fn run(self) -> Result<()> {
        let config = Config::from_env().context("invalid RANGEMARK_* environment")?;

        let client = InventoryClient::connect(&config).with_context(|| {
            format!("failed to connect to inventory API at {}", config.api_url)
        })?;

        if !self.json {
            if let Some(ca) = &config.ca_cert {
                println!("Using trust anchor: {}", ca.display());
            }
            println!("Connected to inventory API at {}", client.endpoint());
        }

        let options = ScanOptions {
            window: PageWindow::new(self.limit, self.offset),
            not_populated_only: self.not_populated_only,
        };
        let report = scan(&client, &config.marker, &options).context("scan failed")?;

        if self.json {
            let summary = self
                .mark_populated
                .then(|| mark_all(&client, &report.candidates));
            return output::print_json(&report, summary.as_ref());
        }

        output::print_report(&report);

        if self.mark_populated && !report.candidates.is_empty() {
            println!();
            println!(
                "Marking {} IP range(s) as populated...",
                report.candidates.len()
            );
            let summary = mark_all(&client, &report.candidates);
            output::print_patch(&summary);
        }

        // Individual patch failures are reported, not escalated: the run is
        // idempotent and safe to repeat for the records that failed.
        Ok(())
    }
}
