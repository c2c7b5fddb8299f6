use crate::utils::config::DEFAULT_TOP_STATEMENTS;
use std::path::PathBuf;

/// Arguments for the parse command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ParseArgs {
    /// Trace log to read
    pub input: PathBuf,

    /// JSON Lines destination (stdout when absent)
    pub output: Option<PathBuf>,

    /// Print a text summary after writing
    pub print_summary: bool,

    /// Number of slowest statements listed in the summary
    pub top_statements: usize,
}

impl Default for ParseArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("trace.log"),
            output: None,
            print_summary: false,
            top_statements: DEFAULT_TOP_STATEMENTS,
        }
    }
}

/// Arguments for the summary command
#[derive(Debug, Clone)]
pub struct SummaryArgs {
    pub input: PathBuf,
    pub top_statements: usize,
    /// Emit the summary as JSON instead of text
    pub json: bool,
}
