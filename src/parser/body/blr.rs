//! BLR compile/execute and DYN execute. The body is either a raw
//! pseudo-disassembly dump after a dashed separator, or only a
//! `Statement <n>:` reference to a request dumped earlier.

use super::reader::BodyReader;
use super::{BodyResult, EventSpan, Records};
use crate::parser::registry::ContextRegistry;
use crate::parser::schema::{BlrCompileEvent, BlrExecuteEvent, DynExecuteEvent, EventKind, TraceEvent};
use crate::utils::error::ParseError;

pub fn parse_blr(kind: EventKind, span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    let mut reader = BodyReader::new(span.body);
    let attachment = reader
        .take_attachment()
        .ok_or(ParseError::MissingField("attachment"))?;
    let transaction = reader.take_transaction(attachment.attachment_id);
    let statement_id = reader.take_statement_id();
    let content = reader.take_dump();
    let perf = reader.take_perf();
    let access = match kind {
        EventKind::ExecuteBlr => reader.take_access_table(),
        _ => None,
    };

    let attachment_id = attachment.attachment_id;
    let transaction_id = transaction.as_ref().map(|t| t.transaction_id);
    let mut records = Records::new();
    records.context(registry, attachment, transaction);
    let event_id = registry.next_event_id();

    let event = match kind {
        EventKind::CompileBlr => TraceEvent::CompileBlr(BlrCompileEvent {
            event_id,
            timestamp: span.timestamp,
            status: span.status,
            attachment_id,
            statement_id,
            content,
            prepare_time: perf.and_then(|perf| perf.run_time),
        }),
        EventKind::ExecuteBlr => TraceEvent::ExecuteBlr(BlrExecuteEvent {
            event_id,
            timestamp: span.timestamp,
            status: span.status,
            attachment_id,
            transaction_id,
            statement_id,
            content,
            perf: perf.unwrap_or_default(),
            access,
        }),
        _ => TraceEvent::ExecuteDyn(DynExecuteEvent {
            event_id,
            timestamp: span.timestamp,
            status: span.status,
            attachment_id,
            transaction_id,
            content,
            run_time: perf.and_then(|perf| perf.run_time),
        }),
    };
    Ok(records.finish(event))
}
