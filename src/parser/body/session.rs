//! Trace session lifecycle: init, suspend marker, finish.

use super::reader::BodyReader;
use super::{BodyResult, EventSpan, Records};
use crate::parser::registry::ContextRegistry;
use crate::parser::schema::{EventKind, SessionEvent, TraceEvent};

pub fn parse_session(kind: EventKind, span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    let mut reader = BodyReader::new(span.body);
    let session_name = reader
        .next_non_blank()
        .map(str::trim)
        .or_else(|| Some(span.rest.trim()).filter(|rest| !rest.is_empty()))
        .map(str::to_string);

    if kind == EventKind::TraceInit {
        if let Some(name) = &session_name {
            registry.note_session(span.timestamp, name.clone());
        }
    }

    let event = SessionEvent {
        event_id: registry.next_event_id(),
        timestamp: span.timestamp,
        session_name,
    };
    let event = match kind {
        EventKind::TraceInit => TraceEvent::TraceInit(event),
        EventKind::TraceSuspend => TraceEvent::TraceSuspend(event),
        _ => TraceEvent::TraceFinish(event),
    };
    Ok(Records::new().finish(event))
}

/// Suspend marker: inherits timestamp and session name from the last init
pub fn parse_suspend(registry: &mut ContextRegistry) -> BodyResult {
    let (timestamp, session_name) = registry.suspend_context();
    let event = SessionEvent {
        event_id: registry.next_event_id(),
        timestamp: timestamp.unwrap_or_default(),
        session_name,
    };
    Ok(Records::new().finish(TraceEvent::TraceSuspend(event)))
}
