use crate::aggregator::TraceSummary;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read a trace file into lines
///
/// Parameter values arrive in the connection charset, so invalid UTF-8 is
/// replaced rather than rejected.
pub fn read_trace_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open trace file {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read trace file {}", path.display()))?;
        if read == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        lines.push(line.trim_end_matches(['\n', '\r']).to_string());
    }

    debug!("Read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Print a summary block with the slowest statements
pub fn print_summary(summary: &TraceSummary) {
    println!("\n{}", "=".repeat(80));
    println!("TRACE SUMMARY");
    println!("{}", "=".repeat(80));
    println!("{}", summary.summary());

    if !summary.by_kind.is_empty() {
        println!("\nEvents by kind:");
        for (kind, count) in &summary.by_kind {
            println!("  {:<28} {}", format!("{:?}", kind), count);
        }
    }

    if !summary.slowest_statements.is_empty() {
        println!(
            "\nSlowest statements (total {} ms):",
            summary.total_statement_time
        );
        for (i, stmt) in summary.slowest_statements.iter().enumerate() {
            let text = stmt
                .sql
                .as_deref()
                .map(first_line)
                .unwrap_or("<unknown statement>");
            println!(
                "  {:>2}. {:>8} ms ({:>5.1}%)  {}",
                i + 1,
                stmt.run_time,
                stmt.percentage,
                text
            );
        }
    }
    println!("{}", "=".repeat(80));
}

fn first_line(sql: &str) -> &str {
    sql.lines().next().unwrap_or("").trim()
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("FB Trace Studio Record Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Each output line is one record:");
        println!("  record: \"info\" | \"event\"");
        println!("  data: object              - Tagged by \"info\" or \"event\"");
        println!();
        println!("Info records (context, emitted once ahead of first use):");
        println!("  attachment   - attachment_id, database, charset, protocol, address?, user, role, remote_process?, remote_pid?");
        println!("  transaction  - attachment_id, transaction_id, initial_id?, options");
        println!("  service      - service_id, user, protocol, address?, remote_process?, remote_pid?");
        println!("  sql          - sql_id, sql, plan?");
        println!("  params       - param_id, params[{{type_name, value?}}]");
        println!();
        println!("Event records (every one has event_id and timestamp):");
        println!("  status: \"ok\" | \"failed\" | \"unauthorized\"  - on database, transaction,");
        println!("                                          statement, routine, service and BLR/DYN events");
        println!("  perf: {{run_time?, reads?, writes?, fetches?, marks?}}");
        println!("  access: [{{table, natural, index, update, insert, delete, backout, purge, expunge}}]");
        println!("  unknown: data                          - raw text of an unrecognized span");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("FB Trace Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Record Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Turns database trace/audit logs into structured JSON Lines records.");
}
