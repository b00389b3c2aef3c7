//! File-backed storage for pending code deliveries.
//!
//! The table maps a recipient identity to its single pending entry: a new
//! submission to the same recipient replaces whatever was waiting. Every
//! mutation rewrites the mirror file wholesale; the in-memory table stays
//! authoritative when the write fails.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Sweep ticks after which a pending entry is dropped.
pub const EXPIRY_TICKS: u32 = 20;

/// One pending code delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeEntry {
    pub from: String,
    pub code: String,
    /// Sweep ticks elapsed since submission.
    pub age: u32,
    pub created_at: i64,
}

/// Store for pending code deliveries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Record a code for a recipient, replacing any entry already pending
    /// for that recipient.
    async fn submit(&self, to: &str, from: &str, code: &str) -> Result<()>;

    /// All pending codes addressed to `identity`, as sender → code.
    async fn fetch_for(&self, identity: &str) -> Result<BTreeMap<String, String>>;

    /// Age every entry by one tick and drop the ones that expired.
    async fn sweep(&self) -> Result<()>;
}

/// File-mirrored implementation of [`CodeStore`].
///
/// Every method holds the table lock for its whole read-modify-write-persist
/// cycle, so mutations are serialized across the runtime's worker threads.
pub struct FileCodeStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, CodeEntry>>,
}

impl FileCodeStore {
    /// Opens the store at `path`, seeding the table from the file when one
    /// is present. A missing or unparsable file yields an empty store; that
    /// is the normal cold-start path, not a startup error.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        "discarding unparsable store file: {err}"
                    );
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no store file, starting empty");
                HashMap::new()
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    "failed to read store file, starting empty: {err}"
                );
                HashMap::new()
            }
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Rewrites the mirror file from the current table. A failed write is
    /// logged and swallowed; the next mutation rewrites the file anyway.
    async fn persist(&self, entries: &HashMap<String, CodeEntry>) {
        let json = match serde_json::to_vec_pretty(entries) {
            Ok(json) => json,
            Err(err) => {
                tracing::error!("failed to serialize store: {err}");
                return;
            }
        };

        if let Err(err) = tokio::fs::write(&self.path, json).await {
            tracing::error!(path = %self.path.display(), "failed to persist store: {err}");
        }
    }
}

#[async_trait]
impl CodeStore for FileCodeStore {
    async fn submit(&self, to: &str, from: &str, code: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;

        entries.insert(
            to.to_string(),
            CodeEntry {
                from: from.to_string(),
                code: code.to_string(),
                age: 0,
                created_at: Utc::now().timestamp(),
            },
        );

        self.persist(&entries).await;
        Ok(())
    }

    async fn fetch_for(&self, identity: &str) -> Result<BTreeMap<String, String>> {
        let entries = self.entries.lock().await;

        Ok(entries
            .iter()
            .filter(|(to, _)| to.as_str() == identity)
            .map(|(_, entry)| (entry.from.clone(), entry.code.clone()))
            .collect())
    }

    async fn sweep(&self) -> Result<()> {
        let mut entries = self.entries.lock().await;

        entries.retain(|_, entry| {
            entry.age += 1;
            entry.age < EXPIRY_TICKS
        });

        // The mirror tracks every tick, whether or not anything changed.
        self.persist(&entries).await;
        Ok(())
    }
}
