//! Forward-only cursor over the body lines of one event.
//!
//! Each `take_*` method consumes its section only when the section is
//! present and otherwise leaves the cursor untouched, so callers can try
//! optional sections in document order.

use super::context::{
    parse_attachment_line, parse_process_line, parse_service_line, parse_transaction_line,
};
use crate::parser::access_table::{decode_table, ColumnLayout};
use crate::parser::schema::{AccessStats, AttachmentInfo, Param, PerfStats, ServiceInfo, TransactionInfo};
use crate::parser::values::{
    is_param_line, is_perf_line, parse_param_line, parse_perf_line, parse_records_fetched,
};
use crate::utils::config::{PLAN_SEPARATOR, SQL_SEPARATOR};
use once_cell::sync::Lazy;
use regex::Regex;

static STATEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Statement (\d+):\s*$").expect("valid statement regex"));

pub struct BodyReader<'a> {
    lines: &'a [String],
    pos: usize,
}

impl<'a> BodyReader<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).map(String::as_str)
    }

    pub fn advance(&mut self) {
        self.pos += 1;
    }

    pub fn skip_blank(&mut self) {
        while self.peek().is_some_and(|line| line.trim().is_empty()) {
            self.pos += 1;
        }
    }

    /// Next non-blank line, consumed
    pub fn next_non_blank(&mut self) -> Option<&'a str> {
        self.skip_blank();
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// All remaining non-blank lines, trimmed
    pub fn rest_trimmed(&mut self) -> Vec<String> {
        let rest = self.lines[self.pos..]
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        self.pos = self.lines.len();
        rest
    }

    /// Consume the next non-blank line when `parse` accepts it
    fn take_with<T>(&mut self, parse: impl FnOnce(&'a str) -> Option<T>) -> Option<T> {
        let saved = self.pos;
        self.skip_blank();
        match self.peek().and_then(parse) {
            Some(value) => {
                self.pos += 1;
                Some(value)
            }
            None => {
                self.pos = saved;
                None
            }
        }
    }

    /// Attachment line plus the optional remote process line after it
    pub fn take_attachment(&mut self) -> Option<AttachmentInfo> {
        let mut info = self.take_with(parse_attachment_line)?;
        if let Some((path, pid)) = self.peek().and_then(parse_process_line) {
            info.remote_process = Some(path);
            info.remote_pid = Some(pid);
            self.pos += 1;
        }
        Some(info)
    }

    pub fn take_transaction(&mut self, attachment_id: u64) -> Option<TransactionInfo> {
        self.take_with(|line| parse_transaction_line(attachment_id, line))
    }

    pub fn take_service(&mut self) -> Option<ServiceInfo> {
        self.take_with(parse_service_line)
    }

    /// `Statement <n>:`
    pub fn take_statement_id(&mut self) -> Option<u64> {
        self.take_with(|line| {
            STATEMENT_RE
                .captures(line.trim())
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
    }

    /// Line starting with `prefix` and ending with `:`, e.g. `Procedure DEPT_BUDGET:`
    pub fn take_labelled_name(&mut self, prefix: &str) -> Option<String> {
        self.take_with(|line| {
            let name = line.trim().strip_prefix(prefix)?.strip_suffix(':')?.trim();
            (!name.is_empty()).then(|| name.to_string())
        })
    }

    /// Statement text after the dashed separator and the optional plan after `^^^`
    pub fn take_sql_and_plan(&mut self) -> Option<(String, Option<String>)> {
        self.take_with(|line| line.starts_with(SQL_SEPARATOR).then_some(()))?;

        let mut sql = Vec::new();
        let mut has_plan = false;
        while let Some(line) = self.peek() {
            if line.starts_with(PLAN_SEPARATOR) {
                self.pos += 1;
                has_plan = true;
                break;
            }
            if is_section_start(line) {
                break;
            }
            sql.push(line);
            self.pos += 1;
        }

        let plan = if has_plan {
            let mut plan = Vec::new();
            while let Some(line) = self.peek() {
                if line.trim().is_empty() || is_section_start(line) {
                    break;
                }
                plan.push(line);
                self.pos += 1;
            }
            Some(plan.join("\n"))
        } else {
            None
        };

        Some((join_trimmed(&sql), plan))
    }

    /// Raw dump after the dashed separator, up to the timing line or access table
    pub fn take_dump(&mut self) -> Option<String> {
        self.take_with(|line| line.starts_with(SQL_SEPARATOR).then_some(()))?;
        let mut dump = Vec::new();
        while let Some(line) = self.peek() {
            if is_perf_line(line) || ColumnLayout::from_header(line).is_some() {
                break;
            }
            dump.push(line);
            self.pos += 1;
        }
        let dump = join_trimmed(&dump);
        (!dump.is_empty()).then_some(dump)
    }

    /// `paramN = type, value` lines; quoted values may span several lines
    pub fn take_params(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        self.skip_blank();
        while let Some(line) = self.peek().filter(|line| is_param_line(line)) {
            self.pos += 1;
            let mut text = line.to_string();
            if value_is_open(line) {
                while let Some(next) = self.peek() {
                    self.pos += 1;
                    text.push('\n');
                    text.push_str(next);
                    if next.trim_end().ends_with('"') {
                        break;
                    }
                }
            }
            if let Some(param) = parse_param_line(&text) {
                params.push(param);
            }
        }
        params
    }

    pub fn take_records_fetched(&mut self) -> Option<u64> {
        self.take_with(parse_records_fetched)
    }

    /// Consume a perf line. `None` also when none of its counts decoded.
    pub fn take_perf(&mut self) -> Option<PerfStats> {
        self.take_with(parse_perf_line).filter(|perf| !perf.is_empty())
    }

    pub fn take_access_table(&mut self) -> Option<Vec<AccessStats>> {
        let saved = self.pos;
        self.skip_blank();
        match decode_table(&self.lines[self.pos..]) {
            Some((rows, consumed)) => {
                self.pos += consumed;
                Some(rows)
            }
            None => {
                self.pos = saved;
                None
            }
        }
    }
}

/// Lines that end free text (SQL, plan) because a structured section starts
fn is_section_start(line: &str) -> bool {
    is_param_line(line)
        || parse_records_fetched(line).is_some()
        || is_perf_line(line)
        || ColumnLayout::from_header(line).is_some()
}

/// Quoted parameter value whose closing quote is on a later line
fn value_is_open(line: &str) -> bool {
    let Some((_, value)) = line.split_once(", ") else {
        return false;
    };
    let value = value.trim_end();
    value.starts_with('"') && (value.len() == 1 || !value.ends_with('"'))
}

/// Join lines, dropping leading and trailing blank lines
fn join_trimmed(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}
