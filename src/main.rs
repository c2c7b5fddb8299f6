//! FB Trace Studio CLI
//!
//! Turns database trace/audit logs into structured JSON Lines records
//! and summarizes them.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use fbtrace_studio::commands::{
    display_schema, display_version, execute_parse, execute_summary, validate_args, ParseArgs,
    SummaryArgs,
};
use fbtrace_studio::utils::config::DEFAULT_TOP_STATEMENTS;

/// FB Trace Studio - structured records from database trace logs
#[derive(Parser, Debug)]
#[command(name = "fbtrace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a trace log into JSON Lines records
    Parse {
        /// Trace log to read
        #[arg(short, long, env = "FBTRACE_INPUT")]
        input: PathBuf,

        /// Output path for JSON Lines (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print text summary after parsing
        #[arg(long)]
        summary: bool,

        /// Number of slowest statements in the summary
        #[arg(long, default_value_t = DEFAULT_TOP_STATEMENTS)]
        top: usize,
    },

    /// Summarize a trace log or a JSON Lines record file
    Summary {
        /// Trace log, or a .jsonl file written by `parse`
        #[arg(short, long, env = "FBTRACE_INPUT")]
        input: PathBuf,

        /// Number of slowest statements to list
        #[arg(long, default_value_t = DEFAULT_TOP_STATEMENTS)]
        top: usize,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Parse {
            input,
            output,
            summary,
            top,
        } => {
            let args = ParseArgs {
                input,
                output,
                print_summary: summary,
                top_statements: top,
            };

            validate_args(&args)?;
            execute_parse(args)?;
        }

        Commands::Summary { input, top, json } => {
            execute_summary(SummaryArgs {
                input,
                top_statements: top,
                json,
            })?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
