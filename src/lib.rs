//! FB Trace Studio
//!
//! Interprets the text trace/audit stream a database engine writes into a
//! sequence of typed records: connection, transaction, service and SQL
//! context records, each emitted once ahead of the first event that needs
//! it, plus one record per traced event.
//!
//! This crate provides the core implementation for the
//! `fbtrace` CLI tool.
//!
//! ## Getting Started
//!
//! ```ignore
//! use fbtrace_studio::parser::parse;
//!
//! for record in parse(trace_text.lines()) {
//!     println!("{:?}", record?);
//! }
//! ```
//!
//! Or from the command line:
//!
//! ```bash
//! fbtrace parse --input trace.log --output records.jsonl --summary
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
