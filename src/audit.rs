//! Audit trail
//!
//! Appends one JSON line per keyring operation. Entries carry the operation
//! name, the normalized address and the outcome. Key material and message
//! payloads are never written.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Entry in the audit log
#[derive(Debug, Serialize)]
struct AuditEntry<'a> {
    timestamp: DateTime<Utc>,
    operation: &'a str,
    address: Option<&'a str>,
    count: Option<usize>,
    status: &'static str,
    error: Option<String>,
}

/// Writer for audit log entries
struct AuditLogWriter {
    path: PathBuf,
}

impl AuditLogWriter {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn write(&self, entry: &AuditEntry<'_>) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }
}

/// Outcome of an audited operation
pub struct AuditRecord<'a> {
    pub operation: &'a str,
    pub address: Option<&'a str>,
    pub count: Option<usize>,
    pub error: Option<String>,
}

impl<'a> AuditRecord<'a> {
    pub fn new(operation: &'a str) -> Self {
        Self {
            operation,
            address: None,
            count: None,
            error: None,
        }
    }

    pub fn address(mut self, address: &'a str) -> Self {
        self.address = Some(address);
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn outcome<T>(mut self, result: &crate::Result<T>) -> Self {
        self.error = result.as_ref().err().map(|e| e.to_string());
        self
    }
}

/// Append-only JSONL audit log, cheap to clone
#[derive(Clone)]
pub struct AuditLog {
    writer: Arc<Mutex<AuditLogWriter>>,
}

impl AuditLog {
    /// Create a new audit log
    ///
    /// # Arguments
    /// * `log_path` - Path to the audit log file (JSONL format)
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(AuditLogWriter::new(log_path.into()))),
        }
    }

    /// Record an operation. Write failures are logged and swallowed.
    pub async fn record(&self, record: AuditRecord<'_>) {
        let status = if record.error.is_some() { "error" } else { "success" };

        let entry = AuditEntry {
            timestamp: Utc::now(),
            operation: record.operation,
            address: record.address,
            count: record.count,
            status,
            error: record.error,
        };

        let writer = self.writer.lock().await;
        if let Err(e) = writer.write(&entry) {
            tracing::warn!(error = %e, "Failed to write audit log entry");
        }
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog").finish_non_exhaustive()
    }
}
