//! Aggregation of parsed trace records into summaries.
//!
//! This module transforms a parsed record stream into:
//! - Statement timings joined with their SQL text
//! - Slowest statement ranking
//! - Event, outcome and context counts

pub mod metrics;
pub mod statements;

// Re-export main types and functions
pub use metrics::{calculate_slowest_statements, calculate_trace_summary, SlowStatement, TraceSummary};
pub use statements::{collect_statement_timings, StatementTiming};
