//! Service manager sessions. No service event describes its service inline,
//! so every one of them resolves the handle.

use super::reader::BodyReader;
use super::{BodyResult, EventSpan, Records};
use crate::parser::registry::ContextRegistry;
use crate::parser::schema::{EventKind, InfoRecord, ServiceEvent, ServiceRequestEvent, TraceEvent};
use crate::parser::values::strip_quotes;
use crate::utils::error::ParseError;

pub fn parse_service(kind: EventKind, span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    let mut reader = BodyReader::new(span.body);
    let service = reader
        .take_service()
        .ok_or(ParseError::MissingField("service"))?;

    // Start/query: quoted action name, then free-form parameter lines
    let request = match kind {
        EventKind::StartService | EventKind::QueryService => {
            reader.skip_blank();
            let action = reader
                .peek()
                .filter(|line| line.trim().starts_with('"'))
                .map(|line| strip_quotes(line).to_string());
            if action.is_some() {
                reader.advance();
            }
            Some((action, reader.rest_trimmed()))
        }
        _ => None,
    };

    let service_id = service.service_id.clone();
    let mut records = Records::new();
    records.info(registry.resolve_service(service).map(InfoRecord::Service));
    let event_id = registry.next_event_id();

    let event = match (kind, request) {
        (EventKind::StartService, Some((action, parameters))) => {
            TraceEvent::StartService(ServiceRequestEvent {
                event_id,
                timestamp: span.timestamp,
                status: span.status,
                service_id,
                action,
                parameters,
            })
        }
        (EventKind::QueryService, Some((action, parameters))) => {
            TraceEvent::QueryService(ServiceRequestEvent {
                event_id,
                timestamp: span.timestamp,
                status: span.status,
                service_id,
                action,
                parameters,
            })
        }
        (EventKind::AttachService, _) => TraceEvent::AttachService(ServiceEvent {
            event_id,
            timestamp: span.timestamp,
            status: span.status,
            service_id,
        }),
        _ => TraceEvent::DetachService(ServiceEvent {
            event_id,
            timestamp: span.timestamp,
            status: span.status,
            service_id,
        }),
    };
    Ok(records.finish(event))
}
