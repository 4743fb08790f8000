//! Employee activity log.
//!
//! Append-only from the MCP core's point of view. Concurrent appends are
//! serialized behind one write lock, so none is lost; their relative order is
//! whatever order they acquire the lock in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::Result;

/// Query type recorded for document searches.
pub const QUERY_TYPE_SEARCH: &str = "search";
/// Query type recorded for questions.
pub const QUERY_TYPE_QUESTION: &str = "question";

/// One logged employee interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub query_id: String,
    pub employee_id: String,
    pub query: String,
    pub query_type: String,
    #[serde(default)]
    pub doc_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "mcp".to_string()
}

impl ActivityEntry {
    /// Build an entry stamped with a fresh id and the current time.
    pub fn new(
        employee_id: impl Into<String>,
        query: impl Into<String>,
        query_type: impl Into<String>,
        doc_id: Option<String>,
    ) -> Self {
        Self {
            query_id: format!("mcp_{}", Uuid::new_v4().simple()),
            employee_id: employee_id.into(),
            query: query.into(),
            query_type: query_type.into(),
            doc_id,
            timestamp: Utc::now(),
            source: default_source(),
        }
    }
}

/// Append-only activity log.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Append one entry.
    async fn append(&self, entry: ActivityEntry) -> Result<()>;

    /// Snapshot of every entry, oldest first.
    async fn entries(&self) -> Vec<ActivityEntry>;

    /// Number of entries.
    async fn len(&self) -> usize {
        self.entries().await.len()
    }
}

/// Activity log held in memory, optionally mirrored to a JSON-lines file.
#[derive(Debug, Default)]
pub struct InMemoryActivityLog {
    entries: RwLock<Vec<ActivityEntry>>,
    file: Option<Mutex<fs::File>>,
    path: Option<PathBuf>,
}

impl InMemoryActivityLog {
    /// Create an empty, memory-only log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a log persisted at `path`. Existing lines are loaded; lines that
    /// fail to parse are skipped.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut entries = Vec::new();
        if fs::try_exists(path).await? {
            let content = fs::read_to_string(path).await?;
            for (line_no, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<ActivityEntry>(line) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => warn!("Skipping activity log line {}: {}", line_no + 1, e),
                }
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        info!(
            "Activity log opened at {} ({} entries)",
            path.display(),
            entries.len()
        );

        Ok(Self {
            entries: RwLock::new(entries),
            file: Some(Mutex::new(file)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[async_trait]
impl ActivityLog for InMemoryActivityLog {
    async fn append(&self, entry: ActivityEntry) -> Result<()> {
        let mut entries = self.entries.write().await;

        if let Some(file) = &self.file {
            let mut line = serde_json::to_string(&entry)?;
            line.push('\n');
            let mut file = file.lock().await;
            file.write_all(line.as_bytes()).await?;
            file.flush().await?;
        }

        entries.push(entry);
        Ok(())
    }

    async fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.read().await.clone()
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_entry_defaults() {
        let entry = ActivityEntry::new("emp_001", "security policy", QUERY_TYPE_SEARCH, None);
        assert!(entry.query_id.starts_with("mcp_"));
        assert_eq!(entry.source, "mcp");
        assert_eq!(entry.query_type, "search");
    }

    #[tokio::test]
    async fn test_append_and_read() {
        let log = InMemoryActivityLog::new();
        log.append(ActivityEntry::new("emp_001", "q1", QUERY_TYPE_SEARCH, None))
            .await
            .unwrap();
        log.append(ActivityEntry::new("emp_002", "q2", QUERY_TYPE_QUESTION, None))
            .await
            .unwrap();

        let entries = log.entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].query, "q1");
        assert_eq!(entries[1].employee_id, "emp_002");
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let log = Arc::new(InMemoryActivityLog::new());
        let mut handles = Vec::new();

        for i in 0..64 {
            let log = log.clone();
            handles.push(tokio::spawn(async move {
                log.append(ActivityEntry::new(
                    format!("emp_{}", i % 4),
                    format!("query {}", i),
                    QUERY_TYPE_SEARCH,
                    None,
                ))
                .await
                .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(log.len().await, 64);
    }

    #[tokio::test]
    async fn test_persisted_log_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("activity.jsonl");

        {
            let log = InMemoryActivityLog::open(&path).await.unwrap();
            log.append(ActivityEntry::new("emp_001", "vacation", QUERY_TYPE_QUESTION, None))
                .await
                .unwrap();
            log.append(ActivityEntry::new(
                "emp_001",
                "handbook",
                QUERY_TYPE_SEARCH,
                Some("doc_001".to_string()),
            ))
            .await
            .unwrap();
        }

        let reopened = InMemoryActivityLog::open(&path).await.unwrap();
        let entries = reopened.entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].doc_id.as_deref(), Some("doc_001"));
        assert_eq!(reopened.path(), Some(path.as_path()));
    }

    #[tokio::test]
    async fn test_corrupt_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("activity.jsonl");
        let good = serde_json::to_string(&ActivityEntry::new("emp_9", "q", "search", None)).unwrap();
        std::fs::write(&path, format!("not json\n{}\n\n", good)).unwrap();

        let log = InMemoryActivityLog::open(&path).await.unwrap();
        assert_eq!(log.len().await, 1);
    }
}
