//! Trigger and stored procedure execution.

use super::reader::BodyReader;
use super::{BodyResult, EventSpan, Records};
use crate::parser::registry::ContextRegistry;
use crate::parser::schema::{
    EventKind, ProcedureFinishEvent, ProcedureStartEvent, TraceEvent, TriggerFinishEvent,
    TriggerStartEvent,
};
use crate::utils::error::ParseError;

/// `BI_EMPLOYEE FOR EMPLOYEE (BEFORE INSERT)` or `TRG_CONNECT (ON CONNECT)`
fn parse_trigger_line(line: &str) -> Option<(String, Option<String>, String)> {
    let line = line.trim();
    let (head, event) = line.strip_suffix(')')?.rsplit_once(" (")?;
    let (trigger, table) = match head.split_once(" FOR ") {
        Some((trigger, table)) => (trigger.trim(), Some(table.trim().to_string())),
        None => (head.trim(), None),
    };
    if trigger.is_empty() {
        return None;
    }
    Some((trigger.to_string(), table, event.trim().to_string()))
}

pub fn parse_trigger(kind: EventKind, span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    let mut reader = BodyReader::new(span.body);
    let attachment = reader
        .take_attachment()
        .ok_or(ParseError::MissingField("attachment"))?;
    let transaction = reader.take_transaction(attachment.attachment_id);
    let (trigger, table, event) = reader
        .next_non_blank()
        .and_then(parse_trigger_line)
        .ok_or(ParseError::MissingField("trigger"))?;

    let attachment_id = attachment.attachment_id;
    let transaction_id = transaction.as_ref().map(|t| t.transaction_id);

    if kind == EventKind::ExecuteTriggerStart {
        let mut records = Records::new();
        records.context(registry, attachment, transaction);
        let start = TriggerStartEvent {
            event_id: registry.next_event_id(),
            timestamp: span.timestamp,
            status: span.status,
            attachment_id,
            transaction_id,
            trigger,
            table,
            event,
        };
        return Ok(records.finish(TraceEvent::ExecuteTriggerStart(start)));
    }

    let perf = reader.take_perf().unwrap_or_default();
    let access = reader.take_access_table();

    let mut records = Records::new();
    records.context(registry, attachment, transaction);
    let finish = TriggerFinishEvent {
        event_id: registry.next_event_id(),
        timestamp: span.timestamp,
        status: span.status,
        attachment_id,
        transaction_id,
        trigger,
        table,
        event,
        perf,
        access,
    };
    Ok(records.finish(TraceEvent::ExecuteTriggerFinish(finish)))
}

pub fn parse_procedure(kind: EventKind, span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    let mut reader = BodyReader::new(span.body);
    let attachment = reader
        .take_attachment()
        .ok_or(ParseError::MissingField("attachment"))?;
    let transaction = reader
        .take_transaction(attachment.attachment_id)
        .ok_or(ParseError::MissingField("transaction"))?;
    let procedure = reader
        .take_labelled_name("Procedure ")
        .ok_or(ParseError::MissingField("procedure"))?;
    let params = reader.take_params();

    let attachment_id = attachment.attachment_id;
    let transaction_id = transaction.transaction_id;

    if kind == EventKind::ExecuteProcedureStart {
        let mut records = Records::new();
        records.context(registry, attachment, Some(transaction));
        let param_id = records.params(registry, params);
        let start = ProcedureStartEvent {
            event_id: registry.next_event_id(),
            timestamp: span.timestamp,
            status: span.status,
            attachment_id,
            transaction_id,
            procedure,
            param_id,
        };
        return Ok(records.finish(TraceEvent::ExecuteProcedureStart(start)));
    }

    let fetched = reader.take_records_fetched();
    let perf = reader.take_perf().unwrap_or_default();
    let access = reader.take_access_table();

    let mut records = Records::new();
    records.context(registry, attachment, Some(transaction));
    let param_id = records.params(registry, params);
    let finish = ProcedureFinishEvent {
        event_id: registry.next_event_id(),
        timestamp: span.timestamp,
        status: span.status,
        attachment_id,
        transaction_id,
        procedure,
        param_id,
        records: fetched,
        perf,
        access,
    };
    Ok(records.finish(TraceEvent::ExecuteProcedureFinish(finish)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_trigger_line() {
        let (trigger, table, event) =
            parse_trigger_line("\tBI_EMPLOYEE FOR EMPLOYEE (BEFORE INSERT)").unwrap();
        assert_eq!(trigger, "BI_EMPLOYEE");
        assert_eq!(table.as_deref(), Some("EMPLOYEE"));
        assert_eq!(event, "BEFORE INSERT");
    }

    #[test]
    fn test_database_trigger_line() {
        let (trigger, table, event) = parse_trigger_line("\tTRG_CONNECT (ON CONNECT)").unwrap();
        assert_eq!(trigger, "TRG_CONNECT");
        assert_eq!(table, None);
        assert_eq!(event, "ON CONNECT");
    }
}
