//! Fixed-width decoder for the per-table access statistics block.
//!
//! ```text
//! Table                             Natural     Index    Update    Insert    Delete   Backout     Purge   Expunge
//! ***************************************************************************************************************
//! RDB$DATABASE                            1
//! EMPLOYEE                                         42                   1
//! ```
//!
//! Counters are right-aligned under their header label and empty cells are
//! left blank, so a value is attributed to a column by where it ends on the
//! line, never by its position in the token list.

use super::schema::AccessStats;
use super::values::parse_u64;
use crate::utils::config::{ACCESS_COUNTER_LABELS, ACCESS_TABLE_LABEL};
use log::debug;

/// Column positions taken from a table header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    /// (label, byte offset one past the label's last character)
    columns: Vec<(String, usize)>,
}

impl ColumnLayout {
    /// Build the layout from a header line, `None` if the line is not one
    pub fn from_header(line: &str) -> Option<Self> {
        let mut tokens = tokens_with_offsets(line);
        let (first, _, _) = tokens.next()?;
        if first != ACCESS_TABLE_LABEL {
            return None;
        }

        let columns: Vec<(String, usize)> = tokens
            .map(|(label, _, end)| (label.to_string(), end))
            .collect();
        if columns.is_empty() || columns[0].0 != ACCESS_COUNTER_LABELS[0] {
            return None;
        }
        Some(Self { columns })
    }

    /// Decode one data row. Blank cells are zero.
    pub fn decode_row(&self, line: &str) -> Option<AccessStats> {
        let (table, rest_offset) = split_table_name(line)?;
        let mut stats = AccessStats {
            table,
            ..AccessStats::default()
        };

        for (token, _, end) in tokens_with_offsets(&line[rest_offset..]) {
            let end = end + rest_offset;
            let Some(label) = self.column_for(end) else {
                continue;
            };
            let Some(value) = parse_u64(token) else {
                debug!("Ignoring non-numeric access cell {:?} under {}", token, label);
                continue;
            };
            if let Some(slot) = counter_slot(&mut stats, label) {
                *slot = value;
            }
        }
        Some(stats)
    }

    /// Column whose span (previous label end, label end] holds `end`.
    /// Values overhanging the last label belong to the last column.
    fn column_for(&self, end: usize) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, label_end)| end <= *label_end)
            .or_else(|| self.columns.last())
            .map(|(label, _)| label.as_str())
    }
}

/// True for the `****` rule under the header
pub fn is_rule_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| c == '*')
}

/// Decode a complete table block: header, optional rule, rows until a blank line.
///
/// Returns the rows and the number of lines consumed.
pub fn decode_table(lines: &[String]) -> Option<(Vec<AccessStats>, usize)> {
    let layout = ColumnLayout::from_header(lines.first()?)?;
    let mut consumed = 1;
    if lines.get(1).is_some_and(|line| is_rule_line(line)) {
        consumed += 1;
    }

    let mut rows = Vec::new();
    for line in &lines[consumed..] {
        if line.trim().is_empty() {
            break;
        }
        match layout.decode_row(line) {
            Some(row) => rows.push(row),
            None => break,
        }
        consumed += 1;
    }
    Some((rows, consumed))
}

fn counter_slot<'a>(stats: &'a mut AccessStats, label: &str) -> Option<&'a mut u64> {
    Some(match label {
        "Natural" => &mut stats.natural,
        "Index" => &mut stats.index,
        "Update" => &mut stats.update,
        "Insert" => &mut stats.insert,
        "Delete" => &mut stats.delete,
        "Backout" => &mut stats.backout,
        "Purge" => &mut stats.purge,
        "Expunge" => &mut stats.expunge,
        _ => return None,
    })
}

/// Table name and the offset where the counter cells begin.
/// Quoted names may contain spaces.
fn split_table_name(line: &str) -> Option<(String, usize)> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let lead = line.len() - trimmed.len();

    let name_len = if let Some(quoted) = trimmed.strip_prefix('"') {
        quoted.find('"').map(|close| close + 2)?
    } else {
        trimmed.find(char::is_whitespace).unwrap_or(trimmed.len())
    };
    Some((trimmed[..name_len].to_string(), lead + name_len))
}

/// Whitespace separated tokens with their byte start and end offsets
fn tokens_with_offsets(line: &str) -> impl Iterator<Item = (&str, usize, usize)> {
    let mut offset = 0;
    line.split(char::is_whitespace).filter_map(move |token| {
        let start = offset;
        offset += token.len() + 1;
        (!token.is_empty()).then(|| (token, start, start + token.len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Table                             Natural     Index    Update    Insert    Delete   Backout     Purge   Expunge";

    #[test]
    fn test_blank_cells_decode_as_zero() {
        let layout = ColumnLayout::from_header(HEADER).unwrap();
        let row = layout
            .decode_row("EMPLOYEE                                         42                   1")
            .unwrap();

        assert_eq!(row.table, "EMPLOYEE");
        assert_eq!(row.natural, 0);
        assert_eq!(row.index, 42);
        assert_eq!(row.update, 0);
        assert_eq!(row.insert, 1);
        assert_eq!(row.expunge, 0);
    }

    #[test]
    fn test_value_attributed_by_offset() {
        let layout = ColumnLayout::from_header(HEADER).unwrap();
        let row = layout
            .decode_row(&format!("{:<12}{:>89}", "RDB$DATABASE", 7))
            .unwrap();

        assert_eq!(row.natural, 0);
        assert_eq!(row.purge, 7);
    }

    #[test]
    fn test_not_a_header() {
        assert!(ColumnLayout::from_header("Table of contents").is_none());
        assert!(ColumnLayout::from_header("").is_none());
    }

    #[test]
    fn test_decode_table_stops_at_blank() {
        let lines: Vec<String> = vec![
            HEADER.to_string(),
            "*".repeat(HEADER.len()),
            "RDB$DATABASE                            1".to_string(),
            String::new(),
            "trailing".to_string(),
        ];
        let (rows, consumed) = decode_table(&lines).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].natural, 1);
        assert_eq!(consumed, 3);
    }
}
