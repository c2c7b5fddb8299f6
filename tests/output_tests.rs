use fbtrace_studio::output::{read_records, write_records, write_records_to};
use fbtrace_studio::parser::parse_all;
use fbtrace_studio::utils::OutputError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

const TRACE: &str = "\
2014-05-23T11:00:28.6000 (3720:0000000000EFD9E8) START_TRANSACTION
\t/home/db/employee.fdb (ATT_8, SYSDBA:NONE, ISO88591, TCPv4:127.0.0.1/50400)
\t\t(TRA_1570, CONCURRENCY | WAIT | READ_WRITE)

2014-05-23T11:00:29.0000 (3720:0000000000EFD9E8) EXECUTE_STATEMENT_START
\t/home/db/employee.fdb (ATT_8, SYSDBA:NONE, ISO88591, TCPv4:127.0.0.1/50400)
\t\t(TRA_1570, CONCURRENCY | WAIT | READ_WRITE)

Statement 9:
-------------------------------------------------------------------------------
update salary_history set new_salary = ? where emp_no = ?

param0 = numeric(18,2), \"105900.00\"
param1 = smallint, \"2\"
param2 = date, \"2014-05-23\"
param3 = boolean, \"TRUE\"
";

#[test]
fn test_write_and_read_records() {
    let records = parse_all(TRACE.lines()).unwrap();
    let temp_file = NamedTempFile::new().unwrap();

    let written = write_records(&records, temp_file.path()).unwrap();
    let loaded = read_records(temp_file.path()).unwrap();

    assert_eq!(written, records.len());
    assert_eq!(loaded, records);
}

#[test]
fn test_one_record_per_line() {
    let records = parse_all(TRACE.lines()).unwrap();
    let mut buffer = Vec::new();

    write_records_to(&records, &mut buffer).unwrap();

    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text.lines().count(), records.len());
    let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
    assert_eq!(first["record"], "info");
    assert_eq!(first["data"]["info"], "attachment");
    assert_eq!(first["data"]["attachment_id"], 8);
}

#[test]
fn test_write_creates_parent_dirs() {
    let records = parse_all(TRACE.lines()).unwrap();
    let temp_dir = tempfile::tempdir().unwrap();
    let nested_path = temp_dir.path().join("nested/dirs/records.jsonl");

    write_records(&records, &nested_path).unwrap();

    assert!(nested_path.exists());
}

#[test]
fn test_read_reports_bad_line() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{{\"record\":\"event\",\"data\":{{\"event\":\"trace_init\",\"event_id\":1,\"timestamp\":\"2014-05-23T11:00:28\",\"session_name\":null}}}}").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "not json").unwrap();

    match read_records(file.path()) {
        Err(OutputError::InvalidRecord { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected invalid record error, got {:?}", other),
    }
}

#[test]
fn test_write_to_directory_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let result = write_records(&[], temp_dir.path());
    assert!(matches!(result, Err(OutputError::InvalidPath(_))));
}
