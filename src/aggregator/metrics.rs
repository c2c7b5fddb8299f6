//! Summary metrics over a parsed trace.
//!
//! Counts events by kind and outcome, counts distinct contexts, and ranks
//! the slowest statement executions.

use super::statements::StatementTiming;
use crate::parser::schema::{EventKind, InfoRecord, Status, TraceEvent, TraceRecord};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A slow statement execution as reported in the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlowStatement {
    pub event_id: u64,
    pub sql_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    pub run_time: u64,
    /// Share of the total statement time
    pub percentage: f64,
}

/// Whole-trace summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    pub total_events: u64,
    pub by_kind: BTreeMap<EventKind, u64>,
    pub failed_events: u64,
    pub unauthorized_events: u64,
    pub unknown_events: u64,
    pub attachments: u64,
    pub transactions: u64,
    pub services: u64,
    pub sql_texts: u64,
    pub param_sets: u64,
    /// Sum of elapsed time over all timed statement executions
    pub total_statement_time: u64,
    pub slowest_statements: Vec<SlowStatement>,
}

impl TraceSummary {
    pub fn count_for(&self, kind: EventKind) -> u64 {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and the CLI
    pub fn summary(&self) -> String {
        format!(
            "Events: {} | Failed: {} | Unauthorized: {} | Unrecognized: {} | Attachments: {} | Transactions: {} | Services: {} | SQL texts: {}",
            self.total_events,
            self.failed_events,
            self.unauthorized_events,
            self.unknown_events,
            self.attachments,
            self.transactions,
            self.services,
            self.sql_texts
        )
    }
}

/// Count events and contexts in a record stream
///
/// **Public** - main entry point for summary metrics
pub fn calculate_trace_summary(
    records: &[TraceRecord],
    timings: &[StatementTiming],
    top_n: usize,
) -> TraceSummary {
    let mut summary = TraceSummary::default();
    let mut attachments = HashSet::new();
    let mut transactions = HashSet::new();

    for record in records {
        match record {
            TraceRecord::Info(info) => match info {
                InfoRecord::Attachment(att) => {
                    attachments.insert(att.attachment_id);
                }
                InfoRecord::Transaction(tra) => {
                    transactions.insert((tra.attachment_id, tra.transaction_id));
                }
                InfoRecord::Service(_) => summary.services += 1,
                InfoRecord::Sql(_) => summary.sql_texts += 1,
                InfoRecord::Params(_) => summary.param_sets += 1,
            },
            TraceRecord::Event(event) => {
                summary.total_events += 1;
                let kind = event.kind();
                *summary.by_kind.entry(kind).or_insert(0) += 1;
                match event.status() {
                    Some(Status::Failed) => summary.failed_events += 1,
                    Some(Status::Unauthorized) => summary.unauthorized_events += 1,
                    _ => {}
                }
                // Connection and transaction events describe their context inline
                match event {
                    TraceEvent::Unknown(_) => summary.unknown_events += 1,
                    TraceEvent::CreateDatabase(conn)
                    | TraceEvent::DropDatabase(conn)
                    | TraceEvent::AttachDatabase(conn)
                    | TraceEvent::DetachDatabase(conn) => {
                        attachments.insert(conn.attachment.attachment_id);
                    }
                    TraceEvent::StartTransaction(tra)
                    | TraceEvent::CommitTransaction(tra)
                    | TraceEvent::CommitRetaining(tra)
                    | TraceEvent::RollbackTransaction(tra)
                    | TraceEvent::RollbackRetaining(tra) => {
                        transactions.insert((tra.attachment_id, tra.transaction_id));
                        if let Some(new_id) = tra.new_transaction_id {
                            transactions.insert((tra.attachment_id, new_id));
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    summary.attachments = attachments.len() as u64;
    summary.transactions = transactions.len() as u64;

    summary.total_statement_time = timings.iter().map(|t| t.run_time).sum();
    summary.slowest_statements =
        calculate_slowest_statements(timings, summary.total_statement_time, top_n);

    debug!("{}", summary.summary());
    summary
}

/// Take the top N timings and convert them to report entries
///
/// Timings are already sorted by elapsed time from `collect_statement_timings`.
pub fn calculate_slowest_statements(
    timings: &[StatementTiming],
    total_time: u64,
    top_n: usize,
) -> Vec<SlowStatement> {
    timings
        .iter()
        .take(top_n)
        .map(|timing| create_slow_statement(timing, total_time))
        .collect()
}

pub fn create_slow_statement(timing: &StatementTiming, total_time: u64) -> SlowStatement {
    let percentage = if total_time > 0 {
        (timing.run_time as f64 / total_time as f64) * 100.0
    } else {
        0.0
    };

    SlowStatement {
        event_id: timing.event_id,
        sql_id: timing.sql_id,
        sql: timing.sql.clone(),
        run_time: timing.run_time,
        percentage,
    }
}
