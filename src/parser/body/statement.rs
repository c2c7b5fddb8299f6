//! Statement lifecycle: prepare, execute start/finish, free, close cursor.
//!
//! ```text
//!     /home/employee.fdb (ATT_8, SYSDBA:NONE, ISO88591, TCPv4:127.0.0.1)
//!     /opt/firebird/bin/isql:8723
//!         (TRA_1570, READ_COMMITTED | REC_VERSION | WAIT | READ_WRITE)
//!
//! Statement 181:
//! -------------------------------------------------------------------------------
//! select * from employee where emp_no = ?
//! ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^
//! PLAN (EMPLOYEE INDEX (RDB$PRIMARY7))
//!
//! param0 = smallint, "2"
//!
//! 1 records fetched
//!       0 ms, 4 fetch(es)
//! ```

use super::reader::BodyReader;
use super::{BodyResult, EventSpan, Records};
use crate::parser::registry::ContextRegistry;
use crate::parser::schema::{
    EventKind, PrepareStatementEvent, StatementFinishEvent, StatementReleaseEvent,
    StatementStartEvent, TraceEvent,
};
use crate::utils::error::ParseError;

pub fn parse_prepare(span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    let mut reader = BodyReader::new(span.body);
    let attachment = reader
        .take_attachment()
        .ok_or(ParseError::MissingField("attachment"))?;
    let transaction = reader.take_transaction(attachment.attachment_id);
    let statement_id = reader
        .take_statement_id()
        .ok_or(ParseError::MissingField("statement id"))?;
    let sql = reader.take_sql_and_plan();
    let prepare_time = reader.take_perf().and_then(|perf| perf.run_time);

    let attachment_id = attachment.attachment_id;
    let transaction_id = transaction.as_ref().map(|t| t.transaction_id);
    let mut records = Records::new();
    records.context(registry, attachment, transaction);
    let sql_id = records.sql(registry, sql);

    let event = PrepareStatementEvent {
        event_id: registry.next_event_id(),
        timestamp: span.timestamp,
        status: span.status,
        attachment_id,
        transaction_id,
        statement_id,
        sql_id,
        prepare_time,
    };
    Ok(records.finish(TraceEvent::PrepareStatement(event)))
}

pub fn parse_execute(kind: EventKind, span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    let mut reader = BodyReader::new(span.body);
    let attachment = reader
        .take_attachment()
        .ok_or(ParseError::MissingField("attachment"))?;
    let transaction = reader
        .take_transaction(attachment.attachment_id)
        .ok_or(ParseError::MissingField("transaction"))?;
    let statement_id = reader
        .take_statement_id()
        .ok_or(ParseError::MissingField("statement id"))?;
    let sql = reader.take_sql_and_plan();
    let params = reader.take_params();

    let attachment_id = attachment.attachment_id;
    let transaction_id = transaction.transaction_id;

    if kind == EventKind::ExecuteStatementStart {
        let mut records = Records::new();
        records.context(registry, attachment, Some(transaction));
        let sql_id = records.sql(registry, sql);
        let param_id = records.params(registry, params);
        let event = StatementStartEvent {
            event_id: registry.next_event_id(),
            timestamp: span.timestamp,
            status: span.status,
            attachment_id,
            transaction_id,
            statement_id,
            sql_id,
            param_id,
        };
        return Ok(records.finish(TraceEvent::ExecuteStatementStart(event)));
    }

    let fetched = reader.take_records_fetched();
    let perf = reader.take_perf().unwrap_or_default();
    let access = reader.take_access_table();

    let mut records = Records::new();
    records.context(registry, attachment, Some(transaction));
    let sql_id = records.sql(registry, sql);
    let param_id = records.params(registry, params);
    let event = StatementFinishEvent {
        event_id: registry.next_event_id(),
        timestamp: span.timestamp,
        status: span.status,
        attachment_id,
        transaction_id,
        statement_id,
        sql_id,
        param_id,
        records: fetched,
        perf,
        access,
    };
    Ok(records.finish(TraceEvent::ExecuteStatementFinish(event)))
}

pub fn parse_release(kind: EventKind, span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    let mut reader = BodyReader::new(span.body);
    let attachment = reader
        .take_attachment()
        .ok_or(ParseError::MissingField("attachment"))?;
    let transaction = reader.take_transaction(attachment.attachment_id);
    let statement_id = reader
        .take_statement_id()
        .ok_or(ParseError::MissingField("statement id"))?;
    let sql = reader.take_sql_and_plan();

    let attachment_id = attachment.attachment_id;
    let transaction_id = transaction.as_ref().map(|t| t.transaction_id);
    let mut records = Records::new();
    records.context(registry, attachment, transaction);
    let sql_id = records.sql(registry, sql);

    let event = StatementReleaseEvent {
        event_id: registry.next_event_id(),
        timestamp: span.timestamp,
        attachment_id,
        transaction_id,
        statement_id,
        sql_id,
    };
    let event = match kind {
        EventKind::CloseCursor => TraceEvent::CloseCursor(event),
        _ => TraceEvent::FreeStatement(event),
    };
    Ok(records.finish(event))
}
