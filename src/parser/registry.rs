//! Per-parse context registry.
//!
//! Remembers which attachments, transactions and services have already been
//! described in the output stream, memoizes SQL texts, and hands out the
//! sequential ids. One registry belongs to exactly one parse call.

use super::schema::{AttachmentInfo, Param, ParamSet, ServiceInfo, SqlInfo, TransactionInfo};
use chrono::NaiveDateTime;
use log::debug;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct ContextRegistry {
    attachments: HashSet<u64>,
    transactions: HashSet<(u64, u64)>,
    services: HashSet<String>,
    sql_texts: HashMap<(String, Option<String>), u64>,
    last_event_id: u64,
    last_sql_id: u64,
    last_param_id: u64,
    last_session: Option<(NaiveDateTime, String)>,
    last_timestamp: Option<NaiveDateTime>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attachment described inline by a connection event
    pub fn register_attachment(&mut self, attachment_id: u64) {
        self.attachments.insert(attachment_id);
    }

    /// Record a transaction described inline by a boundary event
    pub fn register_transaction(&mut self, attachment_id: u64, transaction_id: u64) {
        self.transactions.insert((attachment_id, transaction_id));
    }

    /// Returns the info to emit when this attachment was not seen before
    pub fn resolve_attachment(&mut self, info: AttachmentInfo) -> Option<AttachmentInfo> {
        if self.attachments.insert(info.attachment_id) {
            debug!("Synthesizing context for attachment {}", info.attachment_id);
            Some(info)
        } else {
            None
        }
    }

    pub fn resolve_transaction(&mut self, info: TransactionInfo) -> Option<TransactionInfo> {
        if self
            .transactions
            .insert((info.attachment_id, info.transaction_id))
        {
            debug!(
                "Synthesizing context for transaction {} of attachment {}",
                info.transaction_id, info.attachment_id
            );
            Some(info)
        } else {
            None
        }
    }

    pub fn resolve_service(&mut self, info: ServiceInfo) -> Option<ServiceInfo> {
        if self.services.contains(&info.service_id) {
            return None;
        }
        debug!("Synthesizing context for service {}", info.service_id);
        self.services.insert(info.service_id.clone());
        Some(info)
    }

    /// Id for a (statement, plan) pair, plus the record when the pair is new
    pub fn resolve_sql(&mut self, sql: String, plan: Option<String>) -> (u64, Option<SqlInfo>) {
        let key = (sql, plan);
        if let Some(sql_id) = self.sql_texts.get(&key) {
            return (*sql_id, None);
        }

        self.last_sql_id += 1;
        let sql_id = self.last_sql_id;
        let info = SqlInfo {
            sql_id,
            sql: key.0.clone(),
            plan: key.1.clone(),
        };
        self.sql_texts.insert(key, sql_id);
        (sql_id, Some(info))
    }

    /// Every parameter list gets a fresh id, even a repeated one
    pub fn new_param_set(&mut self, params: Vec<Param>) -> ParamSet {
        self.last_param_id += 1;
        ParamSet {
            param_id: self.last_param_id,
            params,
        }
    }

    pub fn next_event_id(&mut self) -> u64 {
        self.last_event_id += 1;
        self.last_event_id
    }

    pub fn note_timestamp(&mut self, timestamp: NaiveDateTime) {
        self.last_timestamp = Some(timestamp);
    }

    pub fn note_session(&mut self, timestamp: NaiveDateTime, session_name: String) {
        self.last_session = Some((timestamp, session_name));
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.last_timestamp
    }

    /// Timestamp and session name a suspend marker should inherit
    pub fn suspend_context(&self) -> (Option<NaiveDateTime>, Option<String>) {
        match &self.last_session {
            Some((timestamp, name)) => (Some(*timestamp), Some(name.clone())),
            None => (self.last_timestamp, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: &str) -> ServiceInfo {
        ServiceInfo {
            service_id: id.to_string(),
            user: "SYSDBA".to_string(),
            protocol: "TCPv4".to_string(),
            address: None,
            remote_process: None,
            remote_pid: None,
        }
    }

    #[test]
    fn test_service_resolved_once() {
        let mut registry = ContextRegistry::new();
        assert!(registry.resolve_service(service("0000000019993DC0")).is_some());
        assert!(registry.resolve_service(service("0000000019993DC0")).is_none());
        assert!(registry.resolve_service(service("000000001F1F1A40")).is_some());
    }

    #[test]
    fn test_sql_dedup_by_text_and_plan() {
        let mut registry = ContextRegistry::new();
        let (first, info) = registry.resolve_sql("select 1".into(), None);
        assert!(info.is_some());
        let (again, info) = registry.resolve_sql("select 1".into(), None);
        assert_eq!(first, again);
        assert!(info.is_none());
        let (planned, info) = registry.resolve_sql("select 1".into(), Some("PLAN (X NATURAL)".into()));
        assert_ne!(first, planned);
        assert!(info.is_some());
    }

    #[test]
    fn test_param_ids_never_reused() {
        let mut registry = ContextRegistry::new();
        let a = registry.new_param_set(Vec::new());
        let b = registry.new_param_set(Vec::new());
        assert_eq!(a.param_id + 1, b.param_id);
    }

    fn attachment(id: u64) -> AttachmentInfo {
        AttachmentInfo {
            attachment_id: id,
            database: "/data/employee.fdb".to_string(),
            charset: "UTF8".to_string(),
            protocol: "TCPv4".to_string(),
            address: Some("127.0.0.1/50400".to_string()),
            user: "SYSDBA".to_string(),
            role: "NONE".to_string(),
            remote_process: None,
            remote_pid: None,
        }
    }

    #[test]
    fn test_registered_attachment_not_resynthesized() {
        let mut registry = ContextRegistry::new();
        registry.register_attachment(8);
        assert!(registry.resolve_attachment(attachment(8)).is_none());
        assert!(registry.resolve_attachment(attachment(9)).is_some());
    }
}
