//! `SET_CONTEXT`: `[USER_SESSION] MY_VAR = "value"` or `= NULL`.

use super::reader::BodyReader;
use super::{BodyResult, EventSpan, Records};
use crate::parser::registry::ContextRegistry;
use crate::parser::schema::{SetContextEvent, TraceEvent};
use crate::parser::values::strip_quotes;
use crate::utils::config::NULL_SENTINEL;
use crate::utils::error::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;

static CONTEXT_VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\[([^\]]+)\]\s+(.+?)\s*=\s*(.*)$"#).expect("valid context variable regex")
});

fn parse_context_var(line: &str) -> Option<(String, String, Option<String>)> {
    let caps = CONTEXT_VAR_RE.captures(line.trim())?;
    let raw = caps.get(3)?.as_str().trim();
    let value = match raw {
        "NULL" | NULL_SENTINEL => None,
        _ => Some(strip_quotes(raw).to_string()),
    };
    Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string(), value))
}

pub fn parse_set_context(span: &EventSpan, registry: &mut ContextRegistry) -> BodyResult {
    let mut reader = BodyReader::new(span.body);
    let attachment = reader
        .take_attachment()
        .ok_or(ParseError::MissingField("attachment"))?;
    let transaction = reader.take_transaction(attachment.attachment_id);
    let (context, key, value) = reader
        .next_non_blank()
        .and_then(parse_context_var)
        .ok_or(ParseError::MissingField("context variable"))?;

    let attachment_id = attachment.attachment_id;
    let transaction_id = transaction.as_ref().map(|t| t.transaction_id);
    let mut records = Records::new();
    records.context(registry, attachment, transaction);

    let event = SetContextEvent {
        event_id: registry.next_event_id(),
        timestamp: span.timestamp,
        attachment_id,
        transaction_id,
        context,
        key,
        value,
    };
    Ok(records.finish(TraceEvent::SetContext(event)))
}
