//! JSON-backed acceptance ledger for the join-request manager.
//!
//! Records are kept in memory as `group_id -> user_id -> JoinRecord` and
//! written back to a single pretty-printed JSON document after every
//! mutation. Load and save failures are logged and never abort the caller:
//! an unreadable file is treated as "no history yet".
//!
//! # Example
//!
//! ```no_run
//! use join_records::RecordStore;
//!
//! # async fn example() -> join_records::Result<()> {
//! let store = RecordStore::open("data/join_records.json");
//! let now = chrono::Local::now().naive_local();
//! store.record_join("1001", "42", "粉丝", "老粉", now).await?;
//!
//! if let Some(summary) = store.summary("1001").await {
//!     println!("{} members approved", summary.total);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod summary;

pub use error::{RecordError, Result};
pub use models::{GroupRecords, JoinRecord, RecordMap, ACCEPT_TIME_FORMAT, UNKNOWN_CATEGORY};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use join_core::ChartSummary;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Read the records document at `path`.
///
/// A missing file yields an empty map. Read or parse failures are logged and
/// also yield an empty map.
pub fn load(path: &Path) -> RecordMap {
    if !path.exists() {
        debug!("No records file at {}, starting empty", path.display());
        return RecordMap::new();
    }

    let parsed = fs::read_to_string(path)
        .map_err(RecordError::from)
        .and_then(|text| serde_json::from_str::<RecordMap>(&text).map_err(RecordError::from));

    match parsed {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to load join records from {}: {}", path.display(), e);
            RecordMap::new()
        }
    }
}

/// Write the full records map to `path`.
///
/// The document is UTF-8, pretty-printed and keeps non-ASCII text
/// unescaped. It is written to a sibling temp file and renamed into place.
/// Failures are logged before being returned.
pub fn save(path: &Path, records: &RecordMap) -> Result<()> {
    let result = write_document(path, records);
    if let Err(ref e) = result {
        error!("Failed to save join records to {}: {}", path.display(), e);
    }
    result
}

fn write_document(path: &Path, records: &RecordMap) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let text = serde_json::to_string_pretty(records)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, text.as_bytes())?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Process-wide record store.
///
/// Every load-mutate-save sequence runs under one mutex, so concurrent
/// handlers cannot interleave writes.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    records: Mutex<RecordMap>,
}

impl RecordStore {
    /// Open the store, loading whatever the file currently holds.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = load(&path);
        info!(
            "Loaded join records for {} groups from {}",
            records.len(),
            path.display()
        );
        Self {
            path,
            records: Mutex::new(records),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an approved join and save immediately.
    ///
    /// An existing record for the same `(group_id, user_id)` is replaced.
    /// The in-memory record is kept even when saving fails.
    pub async fn record_join(
        &self,
        group_id: &str,
        user_id: &str,
        category: &str,
        keyword: &str,
        accepted_at: NaiveDateTime,
    ) -> Result<()> {
        let mut records = self.records.lock().await;
        records
            .entry(group_id.to_string())
            .or_default()
            .insert(
                user_id.to_string(),
                JoinRecord::accepted(category, keyword, accepted_at),
            );
        debug!("Recorded join of {} into {} ({})", user_id, group_id, category);
        self.persist(&records).await
    }

    /// Write the current map to disk (used on shutdown).
    pub async fn flush(&self) -> Result<()> {
        let records = self.records.lock().await;
        self.persist(&records).await
    }

    /// Save a copy of `records` on the blocking pool.
    ///
    /// The caller holds the lock for the whole write, so saves land in order.
    async fn persist(&self, records: &RecordMap) -> Result<()> {
        let path = self.path.clone();
        let copy = records.clone();
        tokio::task::spawn_blocking(move || save(&path, &copy))
            .await
            .map_err(|e| RecordError::Task(e.to_string()))?
    }

    /// A single record.
    pub async fn get(&self, group_id: &str, user_id: &str) -> Option<JoinRecord> {
        let records = self.records.lock().await;
        records.get(group_id)?.get(user_id).cloned()
    }

    /// All records of one group.
    pub async fn group(&self, group_id: &str) -> Option<GroupRecords> {
        self.records.lock().await.get(group_id).cloned()
    }

    /// Category summary of one group, `None` if the group has no records.
    pub async fn summary(&self, group_id: &str) -> Option<ChartSummary> {
        let records = self.records.lock().await;
        records
            .get(group_id)
            .filter(|group| !group.is_empty())
            .map(|group| summary::summarize(group_id, group))
    }

    /// Total number of records across all groups.
    pub async fn len(&self) -> usize {
        self.records.lock().await.values().map(|g| g.len()).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_record_join_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("join_records.json");

        let store = RecordStore::open(&path);
        assert!(store.is_empty().await);

        store.record_join("1001", "42", "粉丝", "老粉", at(8)).await.unwrap();

        let reopened = RecordStore::open(&path);
        let record = reopened.get("1001", "42").await.unwrap();
        assert_eq!(record.category, "粉丝");
        assert_eq!(record.accept_reason, "匹配关键词: 老粉");
        assert_eq!(record.accept_time, "2024-05-01 08:00:00");
    }

    #[tokio::test]
    async fn test_record_join_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("records.json"));

        store.record_join("1001", "42", "粉丝", "老粉", at(8)).await.unwrap();
        store.record_join("1001", "42", "粉丝", "老粉", at(8)).await.unwrap();
        store.record_join("1001", "42", "同学", "同学", at(9)).await.unwrap();

        let group = store.group("1001").await.unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group["42"].category, "同学");
        assert_eq!(group["42"].accept_time, "2024-05-01 09:00:00");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        fs::write(
            &path,
            r#"{
  "1001": {
    "42": {
      "accept_time": "2024-05-01 08:00:00",
      "accept_reason": "匹配关键词: 老粉",
      "category": "粉丝"
    }
  },
  "2002": {}
}"#,
        )
        .unwrap();

        let first = load(&path);
        save(&path, &first).unwrap();
        let second = load(&path);
        assert_eq!(first, second);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("粉丝"), "non-ASCII must stay unescaped");
        assert!(text.contains("\n  \"1001\""));
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        fs::write(&path, "{ not json").unwrap();

        let store = RecordStore::open(&path);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in place of the file makes the rename fail.
        let path = dir.path().join("records.json");
        fs::create_dir(&path).unwrap();

        let store = RecordStore::open(&path);
        let result = store.record_join("1001", "42", "粉丝", "老粉", at(8)).await;
        assert!(result.is_err());
        // In-memory state survives a failed save.
        assert!(store.get("1001", "42").await.is_some());
        assert!(store.flush().await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_all_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        let store = std::sync::Arc::new(RecordStore::open(&path));

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .record_join("1001", &i.to_string(), "粉丝", "老粉", at(8))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let reopened = RecordStore::open(&path);
        assert_eq!(reopened.len().await, 16);
    }

    #[tokio::test]
    async fn test_summary() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("records.json"));
        assert!(store.summary("1001").await.is_none());

        store.record_join("1001", "1", "粉丝", "老粉", at(8)).await.unwrap();
        store.record_join("1001", "2", "粉丝", "up", at(9)).await.unwrap();
        store.record_join("1001", "3", "同学", "同学", at(10)).await.unwrap();

        let summary = store.summary("1001").await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.categories[0].category, "粉丝");
        assert_eq!(summary.categories[0].count, 2);
    }
}
