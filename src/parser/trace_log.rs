//! Trace log producer.
//!
//! Drives the scanner, classifies each span by its header keyword and runs
//! the matching body parser. Records come out lazily, in encounter order,
//! with any synthesized context ahead of the event that needed it.

use super::body::{self, session, EventSpan};
use super::header::parse_header;
use super::registry::ContextRegistry;
use super::scanner::{LineScanner, Span, SpanStart};
use super::schema::{EventKind, Status, TraceRecord};
use crate::utils::error::ParseError;
use chrono::NaiveDateTime;
use log::{debug, warn};
use std::collections::VecDeque;

/// Parse a sequence of trace lines into records.
///
/// **Public** - main entry point for parsing
///
/// Every call starts from an empty context registry. The only error is
/// [`ParseError::NoEventHeader`], yielded once for non-blank input that
/// contains no event header at all.
///
/// # Example
/// ```ignore
/// for record in parse(text.lines()) {
///     println!("{:?}", record?);
/// }
/// ```
pub fn parse<I>(lines: I) -> TraceLog<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    TraceLog::new(lines.into_iter())
}

/// Parse everything eagerly
pub fn parse_all<I>(lines: I) -> Result<Vec<TraceRecord>, ParseError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    parse(lines).collect()
}

/// Lazy record sequence over one input. Single pass, not seekable.
pub struct TraceLog<I> {
    scanner: LineScanner<I>,
    registry: ContextRegistry,
    pending: VecDeque<TraceRecord>,
}

impl<I> TraceLog<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Self {
            scanner: LineScanner::new(lines),
            registry: ContextRegistry::new(),
            pending: VecDeque::new(),
        }
    }

    /// Turn one span into its records
    fn process(&mut self, span: Span) -> Vec<TraceRecord> {
        let header_line = match &span.start {
            SpanStart::Preamble => {
                let timestamp = self.registry.last_timestamp().unwrap_or_default();
                return vec![self.orphan_lines(timestamp, &span.raw_text())];
            }
            SpanStart::SuspendMarker(_) => {
                let timestamp = self.registry.suspend_context().0.unwrap_or_default();
                let mut records = session::parse_suspend(&mut self.registry).unwrap_or_default();
                if span.has_body() {
                    let text = span.lines.join("\n");
                    debug!("{} line(s) after a suspend marker", span.body().len());
                    records.push(self.orphan_lines(timestamp, &text));
                }
                return records;
            }
            SpanStart::Header(line) => line.as_str(),
        };

        // The scanner only starts spans on lines the header pattern accepts
        let Some(header) = parse_header(header_line) else {
            warn!("Span header no longer matches: {}", header_line);
            return Vec::new();
        };

        let known_timestamp = header.timestamp;
        let timestamp = known_timestamp
            .or_else(|| self.registry.last_timestamp())
            .unwrap_or_default();
        self.registry.note_timestamp(timestamp);

        let raw = span.raw_text();
        let event_span = EventSpan {
            timestamp,
            status: header.status,
            rest: header.rest,
            body: span.body(),
            raw: &raw,
        };

        let kind = match (known_timestamp, EventKind::from_keyword(header.keyword)) {
            (Some(_), Some(kind)) => kind,
            (None, _) => {
                warn!("Malformed timestamp in header: {}", header_line);
                EventKind::Unknown
            }
            (_, None) => {
                debug!("Unrecognized event keyword {:?}", header.keyword);
                EventKind::Unknown
            }
        };

        match body::parse_body(kind, &event_span, &mut self.registry) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "Could not parse {} event at {} ({}), passing it through",
                    header.keyword, timestamp, e
                );
                vec![body::passthrough(&event_span, &mut self.registry)]
            }
        }
    }

    /// Lines that belong to no event header, kept as an unknown record
    fn orphan_lines(&mut self, timestamp: NaiveDateTime, text: &str) -> TraceRecord {
        let span = EventSpan {
            timestamp,
            status: Status::Ok,
            rest: "",
            body: &[],
            raw: text,
        };
        body::passthrough(&span, &mut self.registry)
    }
}

impl<I> Iterator for TraceLog<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<TraceRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }
            let span = match self.scanner.next()? {
                Ok(span) => span,
                Err(e) => return Some(Err(e)),
            };
            let records = self.process(span);
            self.pending.extend(records);
        }
    }
}
