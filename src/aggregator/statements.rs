//! Collect per-execution statement timings from a parsed record stream.
//!
//! Finish events only reference their SQL text by id, so the text is
//! joined back in from the SQL info records seen earlier in the stream.

use crate::parser::schema::{InfoRecord, TraceEvent, TraceRecord};
use log::debug;
use std::collections::HashMap;

/// One finished statement execution with its elapsed time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementTiming {
    pub event_id: u64,
    pub attachment_id: u64,
    pub sql_id: Option<u64>,
    pub sql: Option<String>,
    /// Elapsed milliseconds
    pub run_time: u64,
    pub fetches: u64,
    pub reads: u64,
}

impl StatementTiming {
    pub fn new(event_id: u64, sql: Option<String>, run_time: u64) -> Self {
        Self {
            event_id,
            attachment_id: 0,
            sql_id: None,
            sql,
            run_time,
            fetches: 0,
            reads: 0,
        }
    }
}

/// Build statement timings, sorted by elapsed time (descending)
///
/// **Public** - main entry point for statement analysis
///
/// Executions whose finish line carried no elapsed time are skipped.
pub fn collect_statement_timings(records: &[TraceRecord]) -> Vec<StatementTiming> {
    let mut sql_texts: HashMap<u64, &str> = HashMap::new();
    let mut timings = Vec::new();

    for record in records {
        match record {
            TraceRecord::Info(InfoRecord::Sql(info)) => {
                sql_texts.insert(info.sql_id, info.sql.as_str());
            }
            TraceRecord::Event(TraceEvent::ExecuteStatementFinish(finish)) => {
                let Some(run_time) = finish.perf.run_time else {
                    continue;
                };
                timings.push(StatementTiming {
                    event_id: finish.event_id,
                    attachment_id: finish.attachment_id,
                    sql_id: finish.sql_id,
                    sql: finish
                        .sql_id
                        .and_then(|id| sql_texts.get(&id))
                        .map(|text| text.to_string()),
                    run_time,
                    fetches: finish.perf.fetches.unwrap_or(0),
                    reads: finish.perf.reads.unwrap_or(0),
                });
            }
            _ => {}
        }
    }

    // Slowest first; ties keep encounter order
    timings.sort_by(|a, b| b.run_time.cmp(&a.run_time));
    debug!("Collected {} statement timings", timings.len());
    timings
}
