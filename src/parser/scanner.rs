//! Splits the input line sequence into event spans.
//!
//! A span starts at a header line and runs up to (not including) the next
//! header line or the end of input. Non-blank lines ahead of the first
//! header form a preamble span of their own. Only one line of lookahead is
//! held.

use super::header::{is_header_line, is_suspend_marker};
use crate::utils::error::ParseError;
use log::warn;

/// The line that opened a span
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanStart {
    /// Regular timestamped event header
    Header(String),
    /// Session suspend marker, which carries no timestamp of its own
    SuspendMarker(String),
    /// Lines ahead of the first header; there is no opening line
    Preamble,
}

impl SpanStart {
    pub fn line(&self) -> Option<&str> {
        match self {
            SpanStart::Header(line) | SpanStart::SuspendMarker(line) => Some(line),
            SpanStart::Preamble => None,
        }
    }
}

/// Raw body span of one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: SpanStart,
    /// Every line up to the next span, blank ones included
    pub lines: Vec<String>,
}

impl Span {
    /// Body lines without the trailing blank lines
    pub fn body(&self) -> &[String] {
        let end = self
            .lines
            .iter()
            .rposition(|line| !line.trim().is_empty())
            .map_or(0, |last| last + 1);
        &self.lines[..end]
    }

    pub fn has_body(&self) -> bool {
        !self.body().is_empty()
    }

    /// Opening line and body joined back into the original text
    pub fn raw_text(&self) -> String {
        self.start
            .line()
            .into_iter()
            .chain(self.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn classify_line(line: &str) -> Option<SpanStart> {
    if is_header_line(line) {
        Some(SpanStart::Header(line.to_string()))
    } else if is_suspend_marker(line) {
        Some(SpanStart::SuspendMarker(line.to_string()))
    } else {
        None
    }
}

pub struct LineScanner<I> {
    lines: I,
    /// Opening line of the next span, already read from the input
    pending: Option<SpanStart>,
    started: bool,
    done: bool,
}

impl<I> LineScanner<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            pending: None,
            started: false,
            done: false,
        }
    }

    /// Read up to the first header, returning the lines before it.
    ///
    /// Errors when non-blank input has no header at all.
    fn find_first_header(&mut self) -> Result<Vec<String>, ParseError> {
        let mut leading = Vec::new();
        for line in self.lines.by_ref() {
            let line = line.as_ref();
            if let Some(start) = classify_line(line) {
                self.pending = Some(start);
                return Ok(leading);
            }
            leading.push(line.to_string());
        }

        if leading.iter().any(|line| !line.trim().is_empty()) {
            Err(ParseError::NoEventHeader)
        } else {
            Ok(Vec::new())
        }
    }
}

impl<I> Iterator for LineScanner<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<Span, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.started {
            self.started = true;
            match self.find_first_header() {
                Ok(leading) => {
                    let preamble = Span {
                        start: SpanStart::Preamble,
                        lines: leading,
                    };
                    if preamble.has_body() {
                        warn!(
                            "Passing through {} line(s) before the first event header",
                            preamble.body().len()
                        );
                        return Some(Ok(preamble));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        let Some(start) = self.pending.take() else {
            self.done = true;
            return None;
        };

        let mut lines = Vec::new();
        for line in self.lines.by_ref() {
            let line = line.as_ref();
            if let Some(next_start) = classify_line(line) {
                self.pending = Some(next_start);
                break;
            }
            lines.push(line.to_string());
        }

        Some(Ok(Span { start, lines }))
    }
}
