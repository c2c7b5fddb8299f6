//! Type-directed value decoding.
//!
//! Every decoder here is total: a token that cannot be decoded becomes
//! `None` instead of aborting the surrounding record.

use super::schema::{Param, ParamValue, PerfStats};
use crate::utils::config::NULL_SENTINEL;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

static PARAM_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^param\d+\s*=\s*(.*)$").expect("valid param regex"));

static RECORDS_FETCHED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+) records? fetched\s*$").expect("valid records regex"));

/// Parse a trace timestamp (`2014-05-23T11:00:28.5840`, `T` or space separated)
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(value, layout).ok())
}

/// Parse an unsigned counter, `None` for anything else
pub fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

/// Remove one pair of surrounding double quotes, if present
pub fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Decode `raw` according to the declared engine type name.
///
/// The null sentinel decodes to `None` whatever the declared type is.
pub fn decode_value(type_name: &str, raw: &str) -> Option<ParamValue> {
    let raw = raw.trim();
    if raw == NULL_SENTINEL || raw.eq_ignore_ascii_case("NULL") {
        return None;
    }
    let text = strip_quotes(raw);
    let base = type_name
        .trim()
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    let decoded = match base.as_str() {
        "integer" | "smallint" | "bigint" | "int64" => text.parse().ok().map(ParamValue::Integer),
        "char" | "varchar" | "nchar" | "nvarchar" | "cstring" => {
            Some(ParamValue::Text(text.to_string()))
        }
        "timestamp" => parse_timestamp(text).map(ParamValue::Timestamp),
        "date" => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .map(ParamValue::Date),
        "time" => NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
            .ok()
            .map(ParamValue::Time),
        "double" | "numeric" | "decimal" | "float" => Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .ok()
            .map(ParamValue::Decimal),
        "boolean" => match text.to_ascii_lowercase().as_str() {
            "true" => Some(ParamValue::Boolean(true)),
            "false" => Some(ParamValue::Boolean(false)),
            _ => None,
        },
        _ => Some(ParamValue::Raw(text.to_string())),
    };

    if decoded.is_none() {
        debug!("Could not decode {:?} as {}", raw, type_name);
    }
    decoded
}

/// Parse a `paramN = type, value` line
pub fn parse_param_line(line: &str) -> Option<Param> {
    let caps = PARAM_LINE_RE.captures(line.trim())?;
    let rest = caps.get(1)?.as_str();
    // Type names may contain commas (numeric(18,2)) but never ", "
    let (type_name, raw) = rest.split_once(", ").unwrap_or((rest, NULL_SENTINEL));
    Some(Param {
        type_name: type_name.trim().to_string(),
        value: decode_value(type_name, raw),
    })
}

pub fn is_param_line(line: &str) -> bool {
    PARAM_LINE_RE.is_match(line.trim())
}

/// Parse `N records fetched`
pub fn parse_records_fetched(line: &str) -> Option<u64> {
    RECORDS_FETCHED_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_u64(m.as_str()))
}

/// Parse a `N ms, N read(s), N write(s), N fetch(es), N mark(s)` line.
///
/// The line is recognized by its unit words: every comma-separated item must
/// end in a known unit. A count that does not decode leaves only its own
/// metric `None`.
pub fn parse_perf_line(line: &str) -> Option<PerfStats> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut perf = PerfStats::default();
    for item in line.split(',') {
        let (count, unit) = item.trim().split_once(char::is_whitespace)?;
        let unit = unit.trim();
        let slot = match unit {
            "ms" => &mut perf.run_time,
            "read(s)" => &mut perf.reads,
            "write(s)" => &mut perf.writes,
            "fetch(es)" => &mut perf.fetches,
            "mark(s)" => &mut perf.marks,
            _ => return None,
        };
        *slot = parse_u64(count);
        if slot.is_none() {
            debug!("Could not decode {} count {:?}", unit, count);
        }
    }
    Some(perf)
}

pub fn is_perf_line(line: &str) -> bool {
    parse_perf_line(line).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_numeric_keeps_scale() {
        let value = decode_value("numeric(18,2)", "\"12.50\"");
        assert_eq!(value, Some(ParamValue::Decimal(Decimal::new(1250, 2))));
    }

    #[test]
    fn test_perf_line_rejects_prose() {
        assert!(parse_perf_line("12 tables scanned").is_none());
        assert!(parse_perf_line("select 1 from rdb$database").is_none());
        assert!(parse_perf_line("0 blr_version5,").is_none());
    }

    #[test]
    fn test_perf_line_bad_count_only_drops_that_metric() {
        let perf = parse_perf_line("      0 ms, x read(s), 4 fetch(es)").unwrap();
        assert_eq!(perf.run_time, Some(0));
        assert_eq!(perf.reads, None);
        assert_eq!(perf.fetches, Some(4));

        let perf = parse_perf_line("3 ms, 99999999999999999999 read(s)").unwrap();
        assert_eq!(perf.run_time, Some(3));
        assert_eq!(perf.reads, None);
    }
}
