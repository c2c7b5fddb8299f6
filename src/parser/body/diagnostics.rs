//! `ERROR AT <place>` / `WARNING AT <place>`, raised either on an
//! attachment or on a service session.

use super::reader::BodyReader;
use super::{BodyResult, EventSpan, Records};
use crate::parser::registry::ContextRegistry;
use crate::parser::schema::{DiagnosticEvent, DiagnosticScope, EventKind, InfoRecord, TraceEvent};
use crate::utils::error::ParseError;

pub fn parse_diagnostic(kind: EventKind, span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    let place = span.rest.trim();
    let place = place.strip_prefix("AT ").unwrap_or(place).trim().to_string();

    let mut reader = BodyReader::new(span.body);
    let mut records = Records::new();
    let (scope, details) = if let Some(service) = reader.take_service() {
        let details = reader.rest_trimmed();
        let scope = DiagnosticScope::Service(service.service_id.clone());
        records.info(registry.resolve_service(service).map(InfoRecord::Service));
        (scope, details)
    } else {
        let attachment = reader
            .take_attachment()
            .ok_or(ParseError::MissingField("attachment or service"))?;
        let transaction = reader.take_transaction(attachment.attachment_id);
        let details = reader.rest_trimmed();
        let scope = DiagnosticScope::Attachment(attachment.attachment_id);
        records.context(registry, attachment, transaction);
        (scope, details)
    };

    let event = DiagnosticEvent {
        event_id: registry.next_event_id(),
        timestamp: span.timestamp,
        scope,
        place,
        details,
    };
    let event = match kind {
        EventKind::Warning => TraceEvent::Warning(event),
        _ => TraceEvent::Error(event),
    };
    Ok(records.finish(event))
}
