//! Summary command implementation.
//!
//! Accepts either a raw trace log or a JSON Lines file written by `parse`.

use super::models::SummaryArgs;
use super::utils::{print_summary, read_trace_lines};
use crate::aggregator::{calculate_trace_summary, collect_statement_timings, TraceSummary};
use crate::output::read_records;
use crate::parser::{parse_all, TraceRecord};
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Execute the summary command
///
/// **Public** - main entry point called from main.rs
pub fn execute_summary(args: SummaryArgs) -> Result<()> {
    if args.top_statements == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    let records = load_records(&args.input)?;
    let summary = summarize(&records, args.top_statements);

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .context("Failed to serialize summary")?;
        println!("{}", json);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

/// Build a summary from parsed records
///
/// **Public** - shared by the parse and summary commands
pub fn summarize(records: &[TraceRecord], top_statements: usize) -> TraceSummary {
    let timings = collect_statement_timings(records);
    calculate_trace_summary(records, &timings, top_statements)
}

/// Records from a `.jsonl` file are read back; anything else is parsed as a trace
fn load_records(path: &Path) -> Result<Vec<TraceRecord>> {
    let is_jsonl = path
        .extension()
        .map(|ext| ext == "jsonl")
        .unwrap_or(false);

    if is_jsonl {
        info!("Loading records from: {}", path.display());
        return read_records(path)
            .with_context(|| format!("Failed to read records from {}", path.display()));
    }

    info!("Parsing trace: {}", path.display());
    let lines = read_trace_lines(path)?;
    parse_all(&lines).with_context(|| format!("Failed to parse trace {}", path.display()))
}
