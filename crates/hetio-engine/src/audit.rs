//! Audit log of executed queries.
//!
//! Every successful query appends one [`LogEntry`] holding its kind, a JSON
//! payload and a UTC timestamp. The most recent entry can be exported to a
//! text or CSV file with [`export_entry`].

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LogSinkError;

/// Kind of a logged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// A disease lookup.
    DiseaseInfo,
    /// A repurposing query.
    NewTreatments,
}

impl QueryKind {
    /// The log name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::DiseaseInfo => "disease_info",
            QueryKind::NewTreatments => "new_treatments",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Insertion order within the sink.
    pub sequence: u64,
    /// Kind of query.
    #[serde(rename = "query_type")]
    pub kind: QueryKind,
    /// Normalized result payload.
    pub result: Value,
    /// Time the query finished.
    pub timestamp: DateTime<Utc>,
}

/// Text export layout: `Query Type:`, `Timestamp:` and `Result:` lines.
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Query Type: {}", self.kind)?;
        writeln!(f, "Timestamp: {}", self.timestamp.to_rfc3339())?;
        writeln!(f, "Result:")?;
        writeln!(f, "{}", self.result)
    }
}

/// Destination for audit records.
pub trait AuditLogSink: Send + Sync {
    /// Appends one record.
    fn append(
        &self,
        kind: QueryKind,
        result: Value,
        timestamp: DateTime<Utc>,
    ) -> Result<(), LogSinkError>;

    /// The record with the greatest timestamp; ties go to the later append.
    fn most_recent(&self) -> Result<Option<LogEntry>, LogSinkError>;
}

/// In-memory audit log.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: RwLock<Vec<LogEntry>>,
}

impl MemoryAuditLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copy of every record in append order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }
}

impl AuditLogSink for MemoryAuditLog {
    fn append(
        &self,
        kind: QueryKind,
        result: Value,
        timestamp: DateTime<Utc>,
    ) -> Result<(), LogSinkError> {
        let mut entries = self.entries.write();
        let sequence = entries.len() as u64;
        entries.push(LogEntry {
            sequence,
            kind,
            result,
            timestamp,
        });
        Ok(())
    }

    fn most_recent(&self) -> Result<Option<LogEntry>, LogSinkError> {
        Ok(self
            .entries
            .read()
            .iter()
            .max_by_key(|e| (e.timestamp, e.sequence))
            .cloned())
    }
}

/// File layout for [`export_entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// `Query Type:`, `Timestamp:` and `Result:` lines.
    #[default]
    Text,
    /// A `query_type,timestamp,result` header and one row.
    Csv,
}

/// Writes one entry to `path`, replacing any existing file.
pub fn export_entry(
    entry: &LogEntry,
    path: impl AsRef<Path>,
    format: ExportFormat,
) -> Result<(), LogSinkError> {
    let path = path.as_ref();
    match format {
        ExportFormat::Text => {
            fs::write(path, entry.to_string()).map_err(|e| LogSinkError::export(path, e))
        }
        ExportFormat::Csv => write_csv(entry, path).map_err(|e| LogSinkError::export(path, e)),
    }
}

fn write_csv(entry: &LogEntry, path: &Path) -> csv::Result<()> {
    let timestamp = entry.timestamp.to_rfc3339();
    let payload = entry.result.to_string();

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["query_type", "timestamp", "result"])?;
    writer.write_record([entry.kind.as_str(), timestamp.as_str(), payload.as_str()])?;
    writer.flush()?;
    Ok(())
}
