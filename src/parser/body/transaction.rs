//! Transaction boundaries. The transaction is described inline and
//! registered; its attachment still goes through resolution.

use super::reader::BodyReader;
use super::{BodyResult, EventSpan, Records};
use crate::parser::registry::ContextRegistry;
use crate::parser::schema::{EventKind, InfoRecord, TraceEvent, TransactionEvent};
use crate::parser::values::parse_u64;
use crate::utils::error::ParseError;

pub fn parse_transaction(kind: EventKind, span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    let mut reader = BodyReader::new(span.body);
    let attachment = reader
        .take_attachment()
        .ok_or(ParseError::MissingField("attachment"))?;
    let transaction = reader
        .take_transaction(attachment.attachment_id)
        .ok_or(ParseError::MissingField("transaction"))?;

    // Retaining variants print the number of the continuing transaction
    let new_transaction_id = match kind {
        EventKind::CommitRetaining | EventKind::RollbackRetaining => {
            reader.skip_blank();
            let id = reader
                .peek()
                .and_then(|line| line.trim().strip_prefix("New number"))
                .and_then(parse_u64);
            if id.is_some() {
                reader.advance();
            }
            id
        }
        _ => None,
    };
    let perf = match kind {
        EventKind::StartTransaction => None,
        _ => reader.take_perf(),
    };

    let mut records = Records::new();
    records.info(
        registry
            .resolve_attachment(attachment)
            .map(InfoRecord::Attachment),
    );
    registry.register_transaction(transaction.attachment_id, transaction.transaction_id);

    let event = TransactionEvent {
        event_id: registry.next_event_id(),
        timestamp: span.timestamp,
        status: span.status,
        attachment_id: transaction.attachment_id,
        transaction_id: transaction.transaction_id,
        initial_id: transaction.initial_id,
        options: transaction.options,
        new_transaction_id,
        perf,
    };

    let event = match kind {
        EventKind::StartTransaction => TraceEvent::StartTransaction(event),
        EventKind::CommitTransaction => TraceEvent::CommitTransaction(event),
        EventKind::CommitRetaining => TraceEvent::CommitRetaining(event),
        EventKind::RollbackTransaction => TraceEvent::RollbackTransaction(event),
        _ => TraceEvent::RollbackRetaining(event),
    };
    Ok(records.finish(event))
}
