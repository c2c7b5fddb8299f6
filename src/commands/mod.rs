//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks,
//! and are the only place that touches the filesystem for input.

pub mod models;
pub mod parse;
pub mod summary;
pub mod utils;

// Re-export main command functions
pub use models::{ParseArgs, SummaryArgs};
pub use parse::{execute_parse, validate_args};
pub use summary::{execute_summary, summarize};
pub use utils::{display_schema, display_version};
