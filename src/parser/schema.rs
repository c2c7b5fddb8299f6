//! Record schema definitions for parsed trace output.
//!
//! The parser yields a single sum type, [`TraceRecord`]: either an
//! [`InfoRecord`] (connection/transaction/service context, SQL text or
//! parameter list, emitted once and referenced by id) or a primary
//! [`TraceEvent`] carrying a sequential `event_id`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome qualifier printed in front of the event keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Ok,
    Failed,
    Unauthorized,
}

/// Connection context for one attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentInfo {
    pub attachment_id: u64,
    pub database: String,
    pub charset: String,
    pub protocol: String,
    pub address: Option<String>,
    pub user: String,
    pub role: String,
    pub remote_process: Option<String>,
    pub remote_pid: Option<u32>,
}

/// Transaction context, keyed by (attachment id, transaction id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub attachment_id: u64,
    pub transaction_id: u64,
    /// Id of the transaction this one was started from (retaining chains)
    pub initial_id: Option<u64>,
    /// Isolation and access flags in the order they were printed
    pub options: Vec<String>,
}

/// Service manager session context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service_id: String,
    pub user: String,
    pub protocol: String,
    pub address: Option<String>,
    pub remote_process: Option<String>,
    pub remote_pid: Option<u32>,
}

/// Deduplicated statement text together with its plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlInfo {
    pub sql_id: u64,
    pub sql: String,
    pub plan: Option<String>,
}

/// Decoded parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    Integer(i64),
    Text(String),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Decimal(Decimal),
    Boolean(bool),
    /// Value of a type the decoder has no mapping for, verbatim
    Raw(String),
}

/// One `paramN = type, value` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub type_name: String,
    /// `None` for the NULL sentinel or an undecodable value
    pub value: Option<ParamValue>,
}

/// Parameter list of one statement/procedure execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSet {
    pub param_id: u64,
    pub params: Vec<Param>,
}

/// One row of the per-table access statistics
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessStats {
    pub table: String,
    pub natural: u64,
    pub index: u64,
    pub update: u64,
    pub insert: u64,
    pub delete: u64,
    pub backout: u64,
    pub purge: u64,
    pub expunge: u64,
}

/// `N ms, N read(s), N write(s), N fetch(es), N mark(s)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerfStats {
    pub run_time: Option<u64>,
    pub reads: Option<u64>,
    pub writes: Option<u64>,
    pub fetches: Option<u64>,
    pub marks: Option<u64>,
}

impl PerfStats {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Context, SQL text and parameter records. Never carry an `event_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "info", rename_all = "snake_case")]
pub enum InfoRecord {
    Attachment(AttachmentInfo),
    Transaction(TransactionInfo),
    Service(ServiceInfo),
    Sql(SqlInfo),
    Params(ParamSet),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub session_name: Option<String>,
}

/// Create/attach/detach/drop database; carries its full context inline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub attachment: AttachmentInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub attachment_id: u64,
    pub transaction_id: u64,
    pub initial_id: Option<u64>,
    pub options: Vec<String>,
    /// Transaction number assigned by a retaining commit/rollback
    pub new_transaction_id: Option<u64>,
    /// Only decoded for commit and rollback (including retaining)
    pub perf: Option<PerfStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareStatementEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub attachment_id: u64,
    pub transaction_id: Option<u64>,
    pub statement_id: u64,
    pub sql_id: Option<u64>,
    pub prepare_time: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementStartEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub attachment_id: u64,
    pub transaction_id: u64,
    pub statement_id: u64,
    pub sql_id: Option<u64>,
    pub param_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementFinishEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub attachment_id: u64,
    pub transaction_id: u64,
    pub statement_id: u64,
    pub sql_id: Option<u64>,
    pub param_id: Option<u64>,
    pub records: Option<u64>,
    pub perf: PerfStats,
    pub access: Option<Vec<AccessStats>>,
}

/// Free statement and close cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementReleaseEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub attachment_id: u64,
    pub transaction_id: Option<u64>,
    pub statement_id: u64,
    pub sql_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerStartEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub attachment_id: u64,
    pub transaction_id: Option<u64>,
    pub trigger: String,
    pub table: Option<String>,
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerFinishEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub attachment_id: u64,
    pub transaction_id: Option<u64>,
    pub trigger: String,
    pub table: Option<String>,
    pub event: String,
    pub perf: PerfStats,
    pub access: Option<Vec<AccessStats>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureStartEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub attachment_id: u64,
    pub transaction_id: u64,
    pub procedure: String,
    pub param_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureFinishEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub attachment_id: u64,
    pub transaction_id: u64,
    pub procedure: String,
    pub param_id: Option<u64>,
    pub records: Option<u64>,
    pub perf: PerfStats,
    pub access: Option<Vec<AccessStats>>,
}

/// Attach and detach service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub service_id: String,
}

/// Start and query service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequestEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub service_id: String,
    pub action: Option<String>,
    pub parameters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetContextEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub attachment_id: u64,
    pub transaction_id: Option<u64>,
    pub context: String,
    pub key: String,
    pub value: Option<String>,
}

/// Oldest interesting/active/snapshot and next transaction numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SweepCounters {
    pub oit: Option<u64>,
    pub oat: Option<u64>,
    pub ost: Option<u64>,
    pub next: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub attachment_id: u64,
    pub counters: Option<SweepCounters>,
    pub perf: Option<PerfStats>,
    pub access: Option<Vec<AccessStats>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlrCompileEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub attachment_id: u64,
    pub statement_id: Option<u64>,
    /// `None` when the body only references an already dumped statement
    pub content: Option<String>,
    pub prepare_time: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlrExecuteEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub attachment_id: u64,
    pub transaction_id: Option<u64>,
    pub statement_id: Option<u64>,
    pub content: Option<String>,
    pub perf: PerfStats,
    pub access: Option<Vec<AccessStats>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynExecuteEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub status: Status,
    pub attachment_id: u64,
    pub transaction_id: Option<u64>,
    pub content: Option<String>,
    pub run_time: Option<u64>,
}

/// Who the diagnostic was raised for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticScope {
    Attachment(u64),
    Service(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub scope: DiagnosticScope,
    /// Engine entry point that reported the problem, e.g. `jrd8_attach_database`
    pub place: String,
    pub details: Vec<String>,
}

/// Passthrough for spans whose keyword is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownEvent {
    pub event_id: u64,
    pub timestamp: NaiveDateTime,
    pub data: String,
}

/// Closed set of event kinds, one per trace keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TraceInit,
    TraceSuspend,
    TraceFinish,
    CreateDatabase,
    DropDatabase,
    AttachDatabase,
    DetachDatabase,
    StartTransaction,
    CommitTransaction,
    CommitRetaining,
    RollbackTransaction,
    RollbackRetaining,
    PrepareStatement,
    ExecuteStatementStart,
    ExecuteStatementFinish,
    FreeStatement,
    CloseCursor,
    ExecuteTriggerStart,
    ExecuteTriggerFinish,
    ExecuteProcedureStart,
    ExecuteProcedureFinish,
    AttachService,
    DetachService,
    StartService,
    QueryService,
    SetContext,
    SweepStart,
    SweepProgress,
    SweepFinish,
    SweepFailed,
    CompileBlr,
    ExecuteBlr,
    ExecuteDyn,
    Error,
    Warning,
    Unknown,
}

/// Primary event records, each with a sequential `event_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    TraceInit(SessionEvent),
    TraceSuspend(SessionEvent),
    TraceFinish(SessionEvent),
    CreateDatabase(ConnectionEvent),
    DropDatabase(ConnectionEvent),
    AttachDatabase(ConnectionEvent),
    DetachDatabase(ConnectionEvent),
    StartTransaction(TransactionEvent),
    CommitTransaction(TransactionEvent),
    CommitRetaining(TransactionEvent),
    RollbackTransaction(TransactionEvent),
    RollbackRetaining(TransactionEvent),
    PrepareStatement(PrepareStatementEvent),
    ExecuteStatementStart(StatementStartEvent),
    ExecuteStatementFinish(StatementFinishEvent),
    FreeStatement(StatementReleaseEvent),
    CloseCursor(StatementReleaseEvent),
    ExecuteTriggerStart(TriggerStartEvent),
    ExecuteTriggerFinish(TriggerFinishEvent),
    ExecuteProcedureStart(ProcedureStartEvent),
    ExecuteProcedureFinish(ProcedureFinishEvent),
    AttachService(ServiceEvent),
    DetachService(ServiceEvent),
    StartService(ServiceRequestEvent),
    QueryService(ServiceRequestEvent),
    SetContext(SetContextEvent),
    SweepStart(SweepEvent),
    SweepProgress(SweepEvent),
    SweepFinish(SweepEvent),
    SweepFailed(SweepEvent),
    CompileBlr(BlrCompileEvent),
    ExecuteBlr(BlrExecuteEvent),
    ExecuteDyn(DynExecuteEvent),
    Error(DiagnosticEvent),
    Warning(DiagnosticEvent),
    Unknown(UnknownEvent),
}

/// Expands `$body` once per variant with `$ev` bound to the payload.
/// Every payload struct has `event_id` and `timestamp` fields.
macro_rules! with_payload {
    ($event:expr, $ev:ident => $body:expr) => {
        match $event {
            TraceEvent::TraceInit($ev) | TraceEvent::TraceSuspend($ev) | TraceEvent::TraceFinish($ev) => $body,
            TraceEvent::CreateDatabase($ev)
            | TraceEvent::DropDatabase($ev)
            | TraceEvent::AttachDatabase($ev)
            | TraceEvent::DetachDatabase($ev) => $body,
            TraceEvent::StartTransaction($ev)
            | TraceEvent::CommitTransaction($ev)
            | TraceEvent::CommitRetaining($ev)
            | TraceEvent::RollbackTransaction($ev)
            | TraceEvent::RollbackRetaining($ev) => $body,
            TraceEvent::PrepareStatement($ev) => $body,
            TraceEvent::ExecuteStatementStart($ev) => $body,
            TraceEvent::ExecuteStatementFinish($ev) => $body,
            TraceEvent::FreeStatement($ev) | TraceEvent::CloseCursor($ev) => $body,
            TraceEvent::ExecuteTriggerStart($ev) => $body,
            TraceEvent::ExecuteTriggerFinish($ev) => $body,
            TraceEvent::ExecuteProcedureStart($ev) => $body,
            TraceEvent::ExecuteProcedureFinish($ev) => $body,
            TraceEvent::AttachService($ev) | TraceEvent::DetachService($ev) => $body,
            TraceEvent::StartService($ev) | TraceEvent::QueryService($ev) => $body,
            TraceEvent::SetContext($ev) => $body,
            TraceEvent::SweepStart($ev)
            | TraceEvent::SweepProgress($ev)
            | TraceEvent::SweepFinish($ev)
            | TraceEvent::SweepFailed($ev) => $body,
            TraceEvent::CompileBlr($ev) => $body,
            TraceEvent::ExecuteBlr($ev) => $body,
            TraceEvent::ExecuteDyn($ev) => $body,
            TraceEvent::Error($ev) | TraceEvent::Warning($ev) => $body,
            TraceEvent::Unknown($ev) => $body,
        }
    };
}

impl TraceEvent {
    pub fn event_id(&self) -> u64 {
        with_payload!(self, ev => ev.event_id)
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        with_payload!(self, ev => ev.timestamp)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            TraceEvent::TraceInit(_) => EventKind::TraceInit,
            TraceEvent::TraceSuspend(_) => EventKind::TraceSuspend,
            TraceEvent::TraceFinish(_) => EventKind::TraceFinish,
            TraceEvent::CreateDatabase(_) => EventKind::CreateDatabase,
            TraceEvent::DropDatabase(_) => EventKind::DropDatabase,
            TraceEvent::AttachDatabase(_) => EventKind::AttachDatabase,
            TraceEvent::DetachDatabase(_) => EventKind::DetachDatabase,
            TraceEvent::StartTransaction(_) => EventKind::StartTransaction,
            TraceEvent::CommitTransaction(_) => EventKind::CommitTransaction,
            TraceEvent::CommitRetaining(_) => EventKind::CommitRetaining,
            TraceEvent::RollbackTransaction(_) => EventKind::RollbackTransaction,
            TraceEvent::RollbackRetaining(_) => EventKind::RollbackRetaining,
            TraceEvent::PrepareStatement(_) => EventKind::PrepareStatement,
            TraceEvent::ExecuteStatementStart(_) => EventKind::ExecuteStatementStart,
            TraceEvent::ExecuteStatementFinish(_) => EventKind::ExecuteStatementFinish,
            TraceEvent::FreeStatement(_) => EventKind::FreeStatement,
            TraceEvent::CloseCursor(_) => EventKind::CloseCursor,
            TraceEvent::ExecuteTriggerStart(_) => EventKind::ExecuteTriggerStart,
            TraceEvent::ExecuteTriggerFinish(_) => EventKind::ExecuteTriggerFinish,
            TraceEvent::ExecuteProcedureStart(_) => EventKind::ExecuteProcedureStart,
            TraceEvent::ExecuteProcedureFinish(_) => EventKind::ExecuteProcedureFinish,
            TraceEvent::AttachService(_) => EventKind::AttachService,
            TraceEvent::DetachService(_) => EventKind::DetachService,
            TraceEvent::StartService(_) => EventKind::StartService,
            TraceEvent::QueryService(_) => EventKind::QueryService,
            TraceEvent::SetContext(_) => EventKind::SetContext,
            TraceEvent::SweepStart(_) => EventKind::SweepStart,
            TraceEvent::SweepProgress(_) => EventKind::SweepProgress,
            TraceEvent::SweepFinish(_) => EventKind::SweepFinish,
            TraceEvent::SweepFailed(_) => EventKind::SweepFailed,
            TraceEvent::CompileBlr(_) => EventKind::CompileBlr,
            TraceEvent::ExecuteBlr(_) => EventKind::ExecuteBlr,
            TraceEvent::ExecuteDyn(_) => EventKind::ExecuteDyn,
            TraceEvent::Error(_) => EventKind::Error,
            TraceEvent::Warning(_) => EventKind::Warning,
            TraceEvent::Unknown(_) => EventKind::Unknown,
        }
    }

    /// Outcome qualifier, for the kinds that can carry one
    pub fn status(&self) -> Option<Status> {
        match self {
            TraceEvent::CreateDatabase(ev)
            | TraceEvent::DropDatabase(ev)
            | TraceEvent::AttachDatabase(ev)
            | TraceEvent::DetachDatabase(ev) => Some(ev.status),
            TraceEvent::StartTransaction(ev)
            | TraceEvent::CommitTransaction(ev)
            | TraceEvent::CommitRetaining(ev)
            | TraceEvent::RollbackTransaction(ev)
            | TraceEvent::RollbackRetaining(ev) => Some(ev.status),
            TraceEvent::PrepareStatement(ev) => Some(ev.status),
            TraceEvent::ExecuteStatementStart(ev) => Some(ev.status),
            TraceEvent::ExecuteStatementFinish(ev) => Some(ev.status),
            TraceEvent::ExecuteTriggerStart(ev) => Some(ev.status),
            TraceEvent::ExecuteTriggerFinish(ev) => Some(ev.status),
            TraceEvent::ExecuteProcedureStart(ev) => Some(ev.status),
            TraceEvent::ExecuteProcedureFinish(ev) => Some(ev.status),
            TraceEvent::AttachService(ev) | TraceEvent::DetachService(ev) => Some(ev.status),
            TraceEvent::StartService(ev) | TraceEvent::QueryService(ev) => Some(ev.status),
            TraceEvent::CompileBlr(ev) => Some(ev.status),
            TraceEvent::ExecuteBlr(ev) => Some(ev.status),
            TraceEvent::ExecuteDyn(ev) => Some(ev.status),
            _ => None,
        }
    }
}

/// Everything the parser yields, in encounter order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "record", content = "data", rename_all = "snake_case")]
pub enum TraceRecord {
    Info(InfoRecord),
    Event(TraceEvent),
}

impl TraceRecord {
    pub fn as_event(&self) -> Option<&TraceEvent> {
        match self {
            TraceRecord::Event(event) => Some(event),
            TraceRecord::Info(_) => None,
        }
    }

    pub fn as_info(&self) -> Option<&InfoRecord> {
        match self {
            TraceRecord::Info(info) => Some(info),
            TraceRecord::Event(_) => None,
        }
    }
}

impl From<InfoRecord> for TraceRecord {
    fn from(info: InfoRecord) -> Self {
        TraceRecord::Info(info)
    }
}

impl From<TraceEvent> for TraceRecord {
    fn from(event: TraceEvent) -> Self {
        TraceRecord::Event(event)
    }
}
