//! Royalty report CLI.
//!
//! # Responsibility
//! - Load a JSON catalog through the core import boundary.
//! - Print per-author royalty summaries and optional date lookups.

use bookdeal_core::{
    core_version, default_log_level, import_file, init_logging, AuthorSummary, Contract,
    RoyaltyService,
};
use clap::Parser;
use log::info;
use std::error::Error;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "bookdeal", version, about = "Summarize book contracts and royalties")]
struct Cli {
    /// JSON catalog with `books`, `authors` and `contracts` lists.
    catalog: PathBuf,

    /// Also list contracts signed on this exact date.
    #[arg(long)]
    date: Option<String>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long)]
    log_dir: Option<String>,
}

/// Contracts signed on one requested date.
struct DateListing<'a> {
    date: &'a str,
    contracts: Vec<Contract>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("bookdeal: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("bookdeal: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, Box<dyn Error>> {
    let catalog = import_file(&cli.catalog)?;
    info!(
        "event=cli_report module=cli status=ok core_version={} authors={} contracts={}",
        core_version(),
        catalog.authors.len(),
        catalog.contracts.len()
    );

    let service = RoyaltyService::new();
    let report = service.report(&catalog.authors);
    let listing = cli.date.as_deref().map(|date| DateListing {
        date,
        contracts: service.contracts_on(date),
    });

    if cli.json {
        render_json(&report, listing.as_ref())
    } else {
        Ok(render_text(&report, listing.as_ref()))
    }
}

fn render_text(report: &[AuthorSummary], listing: Option<&DateListing<'_>>) -> String {
    let mut output = String::new();
    for summary in report {
        let _ = writeln!(
            output,
            "{}: books=[{}] contracts={} royalties={}%",
            summary.name,
            summary.books.join(", "),
            summary.contract_count,
            summary.total_royalties
        );
    }
    if let Some(listing) = listing {
        let _ = writeln!(
            output,
            "signed on {}: {}",
            listing.date,
            listing.contracts.len()
        );
        for contract in &listing.contracts {
            let _ = writeln!(output, "  {contract}");
        }
    }
    output
}

fn render_json(
    report: &[AuthorSummary],
    listing: Option<&DateListing<'_>>,
) -> Result<String, Box<dyn Error>> {
    let output = serde_json::json!({
        "version": core_version(),
        "authors": report,
        "contracts_on_date": listing.map(|listing| &listing.contracts),
    });
    let mut rendered = serde_json::to_string_pretty(&output)?;
    rendered.push('\n');
    Ok(rendered)
}
