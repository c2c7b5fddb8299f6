//! Sweep start/progress/finish/failed.
//!
//! ```text
//!     /home/employee.fdb (ATT_8, SYSDBA:NONE, NONE, TCPv4:127.0.0.1/59238)
//!
//! Transaction counters:
//!     Oldest interesting        155
//!     Oldest active             156
//!     Oldest snapshot           156
//!     Next transaction          156
//! ```

use super::reader::BodyReader;
use super::{BodyResult, EventSpan, Records};
use crate::parser::registry::ContextRegistry;
use crate::parser::schema::{EventKind, SweepCounters, SweepEvent, TraceEvent};
use crate::parser::values::parse_u64;
use crate::utils::config::SWEEP_COUNTERS_HEADER;
use crate::utils::error::ParseError;

fn take_counters(reader: &mut BodyReader) -> Option<SweepCounters> {
    reader.skip_blank();
    if reader.peek()?.trim() != SWEEP_COUNTERS_HEADER {
        return None;
    }
    reader.advance();

    let mut counters = SweepCounters::default();
    while let Some(line) = reader.peek() {
        let Some((label, value)) = line.trim().rsplit_once(char::is_whitespace) else {
            break;
        };
        let slot = match label.trim() {
            "Oldest interesting" => &mut counters.oit,
            "Oldest active" => &mut counters.oat,
            "Oldest snapshot" => &mut counters.ost,
            "Next transaction" => &mut counters.next,
            _ => break,
        };
        *slot = parse_u64(value);
        reader.advance();
    }
    Some(counters)
}

pub fn parse_sweep(kind: EventKind, span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    let mut reader = BodyReader::new(span.body);
    let attachment = reader
        .take_attachment()
        .ok_or(ParseError::MissingField("attachment"))?;

    let counters = match kind {
        EventKind::SweepStart | EventKind::SweepFinish => take_counters(&mut reader),
        _ => None,
    };
    let perf = match kind {
        EventKind::SweepProgress | EventKind::SweepFinish => reader.take_perf(),
        _ => None,
    };
    let access = match kind {
        EventKind::SweepProgress => reader.take_access_table(),
        _ => None,
    };

    let attachment_id = attachment.attachment_id;
    let mut records = Records::new();
    records.context(registry, attachment, None);

    let event = SweepEvent {
        event_id: registry.next_event_id(),
        timestamp: span.timestamp,
        attachment_id,
        counters,
        perf,
        access,
    };
    let event = match kind {
        EventKind::SweepStart => TraceEvent::SweepStart(event),
        EventKind::SweepProgress => TraceEvent::SweepProgress(event),
        EventKind::SweepFinish => TraceEvent::SweepFinish(event),
        _ => TraceEvent::SweepFailed(event),
    };
    Ok(records.finish(event))
}
