//! Event header recognition and keyword classification.
//!
//! A header line looks like
//! `2014-05-23T11:00:28.5840 (3720:0000000000EFD9E8) FAILED ATTACH_DATABASE`:
//! timestamp, parenthesized process/thread id, optional status word, keyword,
//! and for some kinds (`ERROR AT jrd8_attach_database`) a trailing remainder.

use super::schema::{EventKind, Status};
use super::values::parse_timestamp;
use crate::utils::config::{STATUS_FAILED, STATUS_UNAUTHORIZED};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d+)\s+\([^)]*\)\s+(?:(FAILED|UNAUTHORIZED)\s+)?(\S+)(?:\s+(.*?))?\s*$",
    )
    .expect("valid header regex")
});

static SUSPEND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-+\s*Session\s+\d+\s+is\s+suspended\b.*$").expect("valid suspend regex")
});

/// Fixed keyword table. The trace-session suspend marker has no keyword
/// and `Unknown` is the fallback, so neither appears here.
const KEYWORDS: &[(&str, EventKind)] = &[
    ("TRACE_INIT", EventKind::TraceInit),
    ("TRACE_FINI", EventKind::TraceFinish),
    ("CREATE_DATABASE", EventKind::CreateDatabase),
    ("DROP_DATABASE", EventKind::DropDatabase),
    ("ATTACH_DATABASE", EventKind::AttachDatabase),
    ("DETACH_DATABASE", EventKind::DetachDatabase),
    ("START_TRANSACTION", EventKind::StartTransaction),
    ("COMMIT_TRANSACTION", EventKind::CommitTransaction),
    ("COMMIT_RETAINING", EventKind::CommitRetaining),
    ("ROLLBACK_TRANSACTION", EventKind::RollbackTransaction),
    ("ROLLBACK_RETAINING", EventKind::RollbackRetaining),
    ("PREPARE_STATEMENT", EventKind::PrepareStatement),
    ("EXECUTE_STATEMENT_START", EventKind::ExecuteStatementStart),
    ("EXECUTE_STATEMENT_FINISH", EventKind::ExecuteStatementFinish),
    ("FREE_STATEMENT", EventKind::FreeStatement),
    ("CLOSE_CURSOR", EventKind::CloseCursor),
    ("EXECUTE_TRIGGER_START", EventKind::ExecuteTriggerStart),
    ("EXECUTE_TRIGGER_FINISH", EventKind::ExecuteTriggerFinish),
    ("EXECUTE_PROCEDURE_START", EventKind::ExecuteProcedureStart),
    ("EXECUTE_PROCEDURE_FINISH", EventKind::ExecuteProcedureFinish),
    ("ATTACH_SERVICE", EventKind::AttachService),
    ("DETACH_SERVICE", EventKind::DetachService),
    ("START_SERVICE", EventKind::StartService),
    ("QUERY_SERVICE", EventKind::QueryService),
    ("SET_CONTEXT", EventKind::SetContext),
    ("SWEEP_START", EventKind::SweepStart),
    ("SWEEP_PROGRESS", EventKind::SweepProgress),
    ("SWEEP_FINISH", EventKind::SweepFinish),
    ("SWEEP_FAILED", EventKind::SweepFailed),
    ("COMPILE_BLR", EventKind::CompileBlr),
    ("EXECUTE_BLR", EventKind::ExecuteBlr),
    ("EXECUTE_DYN", EventKind::ExecuteDyn),
    ("ERROR", EventKind::Error),
    ("WARNING", EventKind::Warning),
];

impl EventKind {
    /// Look up a header keyword, `None` for anything not in the table
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(name, _)| *name == keyword)
            .map(|(_, kind)| *kind)
    }

    /// Keyword as printed in the trace, `None` for kinds without one
    pub fn keyword(&self) -> Option<&'static str> {
        KEYWORDS
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(name, _)| *name)
    }
}

/// Parsed header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header<'a> {
    /// `None` when the timestamp matched the layout but is not a valid date
    pub timestamp: Option<chrono::NaiveDateTime>,
    pub status: Status,
    pub keyword: &'a str,
    pub rest: &'a str,
}

pub fn parse_header(line: &str) -> Option<Header<'_>> {
    let caps = HEADER_RE.captures(line)?;
    let status = match caps.get(2).map(|m| m.as_str()) {
        Some(STATUS_FAILED) => Status::Failed,
        Some(STATUS_UNAUTHORIZED) => Status::Unauthorized,
        _ => Status::Ok,
    };

    Some(Header {
        timestamp: parse_timestamp(caps.get(1)?.as_str()),
        status,
        keyword: caps.get(3)?.as_str(),
        rest: caps.get(4).map_or("", |m| m.as_str()),
    })
}

pub fn is_header_line(line: &str) -> bool {
    HEADER_RE.is_match(line)
}

pub fn is_suspend_marker(line: &str) -> bool {
    SUSPEND_RE.is_match(line.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_fields() {
        let line = "2014-05-23T11:00:30.0000 (3720:0000000000EFD9E8) FAILED ERROR AT jrd8_attach_database";
        let header = parse_header(line).unwrap();
        assert!(header.timestamp.is_some());
        assert_eq!(header.status, Status::Failed);
        assert_eq!(header.keyword, "ERROR");
        assert_eq!(header.rest, "AT jrd8_attach_database");
    }

    #[test]
    fn test_header_without_rest() {
        let header = parse_header("2014-05-23T11:00:28.0000 (1:2) TRACE_INIT").unwrap();
        assert_eq!(header.status, Status::Ok);
        assert_eq!(header.keyword, "TRACE_INIT");
        assert_eq!(header.rest, "");
    }
}
