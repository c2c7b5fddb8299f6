//! Parse command implementation.
//!
//! The parse command:
//! 1. Reads the trace file into lines
//! 2. Parses the lines into records
//! 3. Writes the records as JSON Lines
//! 4. Optionally prints a summary

use super::models::ParseArgs;
use super::summary::summarize;
use super::utils::{print_summary, read_trace_lines};
use crate::output::{write_records, write_records_to};
use crate::parser::parse_all;
use anyhow::{Context, Result};
use log::{debug, info};
use std::io;
use std::time::Instant;

/// Execute the parse command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace file cannot be read
/// * Trace has no event header
/// * Output cannot be written
pub fn execute_parse(args: ParseArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Parsing trace: {}", args.input.display());

    info!("Step 1/3: Reading trace file...");
    let lines = read_trace_lines(&args.input)?;

    info!("Step 2/3: Parsing {} lines...", lines.len());
    let records = parse_all(&lines)
        .with_context(|| format!("Failed to parse trace {}", args.input.display()))?;
    debug!("Parsed {} records", records.len());

    info!("Step 3/3: Writing records...");
    match &args.output {
        Some(path) => {
            write_records(&records, path).context("Failed to write records")?;
            info!("✓ Records written to: {}", path.display());
        }
        None => {
            write_records_to(&records, io::stdout().lock())
                .context("Failed to write records to stdout")?;
        }
    }

    if args.print_summary {
        print_summary(&summarize(&records, args.top_statements));
    }

    info!("Parse completed in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

/// Validate parse arguments
///
/// **Public** - can be called before execute_parse for early validation
pub fn validate_args(args: &ParseArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.is_file() {
        anyhow::bail!("Input is not a file: {}", args.input.display());
    }

    if args.top_statements == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if let Some(output) = &args.output {
        if output == &args.input {
            anyhow::bail!("Output would overwrite the input trace");
        }
    }

    Ok(())
}
