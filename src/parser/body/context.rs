//! Parsers for the context lines that open most event bodies.
//!
//! ```text
//!     /home/employee.fdb (ATT_8, SYSDBA:NONE, ISO88591, TCPv4:192.168.1.5/3050)
//!     /opt/firebird/bin/isql:8723
//!         (TRA_1568, READ_COMMITTED | REC_VERSION | WAIT | READ_WRITE)
//!     service_mgr, (Service 0000000019993DC0, SYSDBA, TCPv4:127.0.0.1, /usr/bin/gbak:385)
//! ```

use crate::parser::schema::{AttachmentInfo, ServiceInfo, TransactionInfo};
use crate::utils::config::{ATTACHMENT_ANCHOR, SERVICE_ANCHOR, TRANSACTION_ANCHOR};

/// `<database> (ATT_<n>, <user>[:<role>], <charset>, <protocol>[:<address>])`
pub fn parse_attachment_line(line: &str) -> Option<AttachmentInfo> {
    let line = line.trim();
    let anchor = line.rfind(ATTACHMENT_ANCHOR)?;
    let inner = line[anchor + 1..].strip_suffix(')')?;

    let mut parts = inner.split(", ");
    // inner starts right after the '(' of the anchor
    let attachment_id = parts.next()?.strip_prefix("ATT_")?.parse().ok()?;
    let (user, role) = parts
        .next()
        .map(|credentials| split_pair(credentials, "NONE"))
        .unwrap_or_default();
    let charset = parts.next().unwrap_or("NONE").trim().to_string();
    let remote = parts.collect::<Vec<_>>().join(", ");
    let (protocol, address) = split_remote(&remote);

    Some(AttachmentInfo {
        attachment_id,
        database: line[..anchor].trim().to_string(),
        charset,
        protocol,
        address,
        user,
        role,
        remote_process: None,
        remote_pid: None,
    })
}

/// `<path>:<pid>` following an attachment line
pub fn parse_process_line(line: &str) -> Option<(String, u32)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('(') {
        return None;
    }
    let (path, pid) = line.rsplit_once(':')?;
    let pid = pid.trim().parse().ok()?;
    (!path.is_empty()).then(|| (path.to_string(), pid))
}

/// `(TRA_<n>[, INIT_<m>], OPT | OPT | ...)`
pub fn parse_transaction_line(attachment_id: u64, line: &str) -> Option<TransactionInfo> {
    let inner = line
        .trim()
        .strip_prefix(TRANSACTION_ANCHOR)?
        .strip_suffix(')')?;

    let mut parts = inner.split(", ");
    let transaction_id = parts.next()?.trim().parse().ok()?;
    let mut initial_id = None;
    let mut options = Vec::new();
    for part in parts {
        if let Some(initial) = part.trim().strip_prefix("INIT_") {
            initial_id = initial.parse().ok();
            continue;
        }
        options.extend(
            part.split('|')
                .map(str::trim)
                .filter(|option| !option.is_empty())
                .map(str::to_string),
        );
    }

    Some(TransactionInfo {
        attachment_id,
        transaction_id,
        initial_id,
        options,
    })
}

/// `<name>, (Service <handle>, <user>, <protocol>[:<address>][, <process>[:<pid>]])`
pub fn parse_service_line(line: &str) -> Option<ServiceInfo> {
    let line = line.trim();
    let anchor = line.find(SERVICE_ANCHOR)?;
    let inner = line[anchor + SERVICE_ANCHOR.len()..].strip_suffix(')')?;

    let mut parts = inner.split(", ");
    let service_id = parts.next()?.trim();
    if service_id.is_empty() {
        return None;
    }
    let user = parts.next().unwrap_or_default().trim().to_string();
    let (protocol, address) = split_remote(parts.next().unwrap_or_default());
    let (remote_process, remote_pid) = match parts.next() {
        Some(process) => match parse_process_line(process) {
            Some((path, pid)) => (Some(path), Some(pid)),
            None => (Some(process.trim().to_string()), None),
        },
        None => (None, None),
    };

    Some(ServiceInfo {
        service_id: service_id.to_string(),
        user,
        protocol,
        address,
        remote_process,
        remote_pid,
    })
}

fn split_pair(value: &str, default_second: &str) -> (String, String) {
    match value.trim().split_once(':') {
        Some((first, second)) => (first.to_string(), second.to_string()),
        None => (value.trim().to_string(), default_second.to_string()),
    }
}

/// `TCPv4:127.0.0.1/3050` -> (`TCPv4`, `127.0.0.1/3050`); `<internal>` has no address
fn split_remote(value: &str) -> (String, Option<String>) {
    let value = value.trim();
    match value.split_once(':') {
        Some((protocol, address)) if !address.is_empty() => {
            (protocol.to_string(), Some(address.to_string()))
        }
        Some((protocol, _)) => (protocol.to_string(), None),
        None => (value.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_line() {
        let info = parse_attachment_line(
            "\t/home/db/employee.fdb (ATT_8, SYSDBA:NONE, ISO88591, TCPv4:192.168.1.5/3050)",
        )
        .unwrap();
        assert_eq!(info.attachment_id, 8);
        assert_eq!(info.database, "/home/db/employee.fdb");
        assert_eq!(info.user, "SYSDBA");
        assert_eq!(info.role, "NONE");
        assert_eq!(info.charset, "ISO88591");
        assert_eq!(info.protocol, "TCPv4");
        assert_eq!(info.address.as_deref(), Some("192.168.1.5/3050"));
    }

    #[test]
    fn test_internal_attachment_has_no_address() {
        let info = parse_attachment_line("\tC:\\DB\\E.FDB (ATT_0, <unknown_user>, NONE, <internal>)").unwrap();
        assert_eq!(info.attachment_id, 0);
        assert_eq!(info.protocol, "<internal>");
        assert_eq!(info.address, None);
        assert_eq!(info.role, "NONE");
    }

    #[test]
    fn test_transaction_line_with_initial_id() {
        let info = parse_transaction_line(8, "\t\t(TRA_12, INIT_11, CONCURRENCY | WAIT | READ_WRITE)").unwrap();
        assert_eq!(info.transaction_id, 12);
        assert_eq!(info.initial_id, Some(11));
        assert_eq!(info.options, vec!["CONCURRENCY", "WAIT", "READ_WRITE"]);
    }

    #[test]
    fn test_windows_process_line() {
        let (path, pid) = parse_process_line("\tC:\\Program Files\\isql.exe:4242").unwrap();
        assert_eq!(path, "C:\\Program Files\\isql.exe");
        assert_eq!(pid, 4242);
        assert!(parse_process_line("\tStatement 12:").is_none());
    }
}
