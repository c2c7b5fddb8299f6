//! Create/drop/attach/detach database. These carry their attachment inline
//! and register it, so later events on the same attachment need no
//! synthesized context.

use super::reader::BodyReader;
use super::{BodyResult, EventSpan, Records};
use crate::parser::registry::ContextRegistry;
use crate::parser::schema::{ConnectionEvent, EventKind, TraceEvent};
use crate::utils::error::ParseError;

pub fn parse_connection(kind: EventKind, span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    let attachment = BodyReader::new(span.body)
        .take_attachment()
        .ok_or(ParseError::MissingField("attachment"))?;

    registry.register_attachment(attachment.attachment_id);
    let event = ConnectionEvent {
        event_id: registry.next_event_id(),
        timestamp: span.timestamp,
        status: span.status,
        attachment,
    };

    let event = match kind {
        EventKind::CreateDatabase => TraceEvent::CreateDatabase(event),
        EventKind::DropDatabase => TraceEvent::DropDatabase(event),
        EventKind::AttachDatabase => TraceEvent::AttachDatabase(event),
        _ => TraceEvent::DetachDatabase(event),
    };
    Ok(Records::new().finish(event))
}
