use fbtrace_studio::aggregator::metrics::{
    calculate_slowest_statements, calculate_trace_summary, create_slow_statement,
};
use fbtrace_studio::aggregator::statements::{collect_statement_timings, StatementTiming};
use fbtrace_studio::parser::parse_all;
use fbtrace_studio::parser::schema::EventKind;
use pretty_assertions::assert_eq;

const TRACE: &str = "\
2014-05-23T11:00:28.0000 (3720:0000000000EFD9E8) TRACE_INIT
\tSESSION_1

2014-05-23T11:00:28.5840 (3720:0000000000EFD9E8) ATTACH_DATABASE
\t/home/db/employee.fdb (ATT_8, SYSDBA:NONE, ISO88591, TCPv4:127.0.0.1/50400)

2014-05-23T11:00:29.0000 (3720:0000000000EFD9E8) EXECUTE_STATEMENT_FINISH
\t/home/db/employee.fdb (ATT_8, SYSDBA:NONE, ISO88591, TCPv4:127.0.0.1/50400)
\t\t(TRA_1570, READ_COMMITTED | REC_VERSION | WAIT | READ_WRITE)

Statement 181:
-------------------------------------------------------------------------------
select * from employee

12 records fetched
     30 ms, 4 read(s), 40 fetch(es)

2014-05-23T11:00:29.1000 (3720:0000000000EFD9E8) EXECUTE_STATEMENT_FINISH
\t/home/db/employee.fdb (ATT_8, SYSDBA:NONE, ISO88591, TCPv4:127.0.0.1/50400)
\t\t(TRA_1570, READ_COMMITTED | REC_VERSION | WAIT | READ_WRITE)

Statement 182:
-------------------------------------------------------------------------------
select * from department

3 records fetched
     10 ms, 6 fetch(es)

2014-05-23T11:00:29.2000 (3720:0000000000EFD9E8) EXECUTE_STATEMENT_FINISH
\t/home/db/employee.fdb (ATT_8, SYSDBA:NONE, ISO88591, TCPv4:127.0.0.1/50400)
\t\t(TRA_1570, READ_COMMITTED | REC_VERSION | WAIT | READ_WRITE)

Statement 183:
-------------------------------------------------------------------------------
select * from project

2014-05-23T11:00:29.3000 (3720:0000000000EFD9E8) FAILED ATTACH_DATABASE
\t/home/db/missing.fdb (ATT_9, SYSDBA:NONE, NONE, TCPv4:127.0.0.1)

2014-05-23T11:00:29.4000 (3720:0000000000EFD9E8) SOMETHING_NEW
\tpayload
";

#[test]
fn test_collect_statement_timings() {
    let records = parse_all(TRACE.lines()).unwrap();
    let timings = collect_statement_timings(&records);

    // The third finish has no timing line
    assert_eq!(timings.len(), 2);
    assert_eq!(timings[0].run_time, 30);
    assert_eq!(timings[0].sql.as_deref(), Some("select * from employee"));
    assert_eq!(timings[0].reads, 4);
    assert_eq!(timings[0].fetches, 40);
    assert_eq!(timings[1].run_time, 10);
    assert_eq!(timings[1].sql.as_deref(), Some("select * from department"));
}

#[test]
fn test_trace_summary_counts() {
    let records = parse_all(TRACE.lines()).unwrap();
    let timings = collect_statement_timings(&records);
    let summary = calculate_trace_summary(&records, &timings, 5);

    assert_eq!(summary.total_events, 7);
    assert_eq!(summary.count_for(EventKind::ExecuteStatementFinish), 3);
    assert_eq!(summary.count_for(EventKind::AttachDatabase), 2);
    assert_eq!(summary.count_for(EventKind::DetachDatabase), 0);
    assert_eq!(summary.failed_events, 1);
    assert_eq!(summary.unauthorized_events, 0);
    assert_eq!(summary.unknown_events, 1);
    assert_eq!(summary.attachments, 2);
    assert_eq!(summary.transactions, 1);
    assert_eq!(summary.sql_texts, 3);
    assert_eq!(summary.param_sets, 0);
    assert_eq!(summary.total_statement_time, 40);
    assert_eq!(summary.slowest_statements.len(), 2);
    assert_eq!(summary.slowest_statements[0].percentage, 75.0);
}

#[test]
fn test_calculate_slowest_statements() {
    let timings = vec![
        StatementTiming::new(3, Some("select 3".to_string()), 500),
        StatementTiming::new(1, Some("select 1".to_string()), 300),
        StatementTiming::new(2, None, 200),
    ];

    let slowest = calculate_slowest_statements(&timings, 1000, 2);

    assert_eq!(slowest.len(), 2);
    assert_eq!(slowest[0].event_id, 3);
    assert_eq!(slowest[0].run_time, 500);
    assert_eq!(slowest[0].percentage, 50.0);
    assert_eq!(slowest[1].sql.as_deref(), Some("select 1"));
}

#[test]
fn test_create_slow_statement_zero_total() {
    let timing = StatementTiming::new(1, None, 0);
    let slow = create_slow_statement(&timing, 0);

    assert_eq!(slow.percentage, 0.0);
    assert_eq!(slow.sql, None);
}

#[test]
fn test_summary_empty() {
    let summary = calculate_trace_summary(&[], &[], 10);

    assert_eq!(summary.total_events, 0);
    assert!(summary.by_kind.is_empty());
    assert!(summary.slowest_statements.is_empty());
    assert!(summary.summary().starts_with("Events: 0"));
}
