//! Trace log parsing and record schema definitions.
//!
//! This module handles:
//! - Splitting raw trace lines into event spans
//! - Classifying spans by header keyword
//! - Decoding event bodies into typed records
//! - Synthesizing connection/transaction/service context on first reference

pub mod access_table;
pub mod body;
pub mod header;
pub mod registry;
pub mod scanner;
pub mod schema;
pub mod trace_log;
pub mod values;

// Re-export main types
pub use registry::ContextRegistry;
pub use schema::{
    AccessStats, AttachmentInfo, EventKind, InfoRecord, Param, ParamSet, ParamValue, PerfStats,
    ServiceInfo, SqlInfo, Status, TraceEvent, TraceRecord, TransactionInfo,
};
pub use trace_log::{parse, parse_all, TraceLog};
