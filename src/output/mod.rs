//! Output writers for parsed trace records.
//!
//! Records are written as JSON Lines, one record per line, and can be
//! read back for validation and re-analysis.

pub mod json;

// Re-export main functions
pub use json::{read_records, write_records, write_records_to};
