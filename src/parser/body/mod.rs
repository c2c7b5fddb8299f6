//! Body parsers, one module per event family.
//!
//! Every parser works in two phases: it first extracts all fields from the
//! span (failing with [`ParseError::MissingField`] if an identifying field is
//! absent), and only then touches the registry to resolve context, assign
//! SQL/parameter ids and the event id. A failed parse therefore leaves the
//! registry unchanged and the span can be passed through as unrecognized.

pub mod blr;
pub mod connection;
pub mod context;
pub mod diagnostics;
pub mod reader;
pub mod routine;
pub mod service;
pub mod session;
pub mod set_context;
pub mod statement;
pub mod sweep;
pub mod transaction;

use super::registry::ContextRegistry;
use super::schema::{
    AttachmentInfo, EventKind, InfoRecord, Param, Status, TraceEvent, TraceRecord,
    TransactionInfo, UnknownEvent,
};
use crate::utils::error::ParseError;
use chrono::NaiveDateTime;

/// A classified span, ready for its body parser
#[derive(Debug, Clone)]
pub struct EventSpan<'a> {
    pub timestamp: NaiveDateTime,
    pub status: Status,
    /// Header text after the keyword (`AT jrd8_attach_database`)
    pub rest: &'a str,
    pub body: &'a [String],
    /// Header and body exactly as read, for the passthrough record
    pub raw: &'a str,
}

pub type BodyResult = Result<Vec<TraceRecord>, ParseError>;

/// Route a span to the parser for its kind
pub fn parse_body(kind: EventKind, span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    match kind {
        EventKind::TraceInit | EventKind::TraceFinish | EventKind::TraceSuspend => {
            session::parse_session(kind, span, registry)
        }
        EventKind::CreateDatabase
        | EventKind::DropDatabase
        | EventKind::AttachDatabase
        | EventKind::DetachDatabase => connection::parse_connection(kind, span, registry),
        EventKind::StartTransaction
        | EventKind::CommitTransaction
        | EventKind::CommitRetaining
        | EventKind::RollbackTransaction
        | EventKind::RollbackRetaining => transaction::parse_transaction(kind, span, registry),
        EventKind::PrepareStatement => statement::parse_prepare(span, registry),
        EventKind::ExecuteStatementStart | EventKind::ExecuteStatementFinish => {
            statement::parse_execute(kind, span, registry)
        }
        EventKind::FreeStatement | EventKind::CloseCursor => {
            statement::parse_release(kind, span, registry)
        }
        EventKind::ExecuteTriggerStart | EventKind::ExecuteTriggerFinish => {
            routine::parse_trigger(kind, span, registry)
        }
        EventKind::ExecuteProcedureStart | EventKind::ExecuteProcedureFinish => {
            routine::parse_procedure(kind, span, registry)
        }
        EventKind::AttachService
        | EventKind::DetachService
        | EventKind::StartService
        | EventKind::QueryService => service::parse_service(kind, span, registry),
        EventKind::SetContext => set_context::parse_set_context(span, registry),
        EventKind::SweepStart
        | EventKind::SweepProgress
        | EventKind::SweepFinish
        | EventKind::SweepFailed => sweep::parse_sweep(kind, span, registry),
        EventKind::CompileBlr | EventKind::ExecuteBlr | EventKind::ExecuteDyn => {
            blr::parse_blr(kind, span, registry)
        }
        EventKind::Error | EventKind::Warning => diagnostics::parse_diagnostic(kind, span, registry),
        EventKind::Unknown => Ok(vec![passthrough(span, registry)]),
    }
}

/// Verbatim record for a span nobody could parse
pub fn passthrough(span: &EventSpan, registry: &mut ContextRegistry) -> TraceRecord {
    TraceEvent::Unknown(UnknownEvent {
        event_id: registry.next_event_id(),
        timestamp: span.timestamp,
        data: span.raw.to_string(),
    })
    .into()
}

/// Collects the records of one span in emission order
#[derive(Debug, Default)]
pub(crate) struct Records(Vec<TraceRecord>);

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, info: Option<InfoRecord>) {
        if let Some(info) = info {
            self.0.push(info.into());
        }
    }

    /// Resolve attachment and transaction context, emitting what is new
    pub fn context(
        &mut self,
        registry: &mut ContextRegistry,
        attachment: AttachmentInfo,
        transaction: Option<TransactionInfo>,
    ) {
        self.info(registry.resolve_attachment(attachment).map(InfoRecord::Attachment));
        if let Some(transaction) = transaction {
            self.info(registry.resolve_transaction(transaction).map(InfoRecord::Transaction));
        }
    }

    /// Memoized SQL id for a statement text, if one was printed
    pub fn sql(
        &mut self,
        registry: &mut ContextRegistry,
        sql: Option<(String, Option<String>)>,
    ) -> Option<u64> {
        let (text, plan) = sql?;
        let (sql_id, info) = registry.resolve_sql(text, plan);
        self.info(info.map(InfoRecord::Sql));
        Some(sql_id)
    }

    /// Fresh parameter list id, `None` for an empty list
    pub fn params(&mut self, registry: &mut ContextRegistry, params: Vec<Param>) -> Option<u64> {
        if params.is_empty() {
            return None;
        }
        let set = registry.new_param_set(params);
        let param_id = set.param_id;
        self.info(Some(InfoRecord::Params(set)));
        Some(param_id)
    }

    pub fn finish(mut self, event: TraceEvent) -> Vec<TraceRecord> {
        self.0.push(event.into());
        self.0
    }
}
