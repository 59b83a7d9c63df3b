//! Append-only history of successful prompt/completion exchanges.
//!
//! One JSON object per line. Records are written only after a genuine
//! upstream exchange, with the latency already computed; nothing in this
//! service mutates or deletes them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub timestamp: String,
    pub origin: String,
    pub latency: u64,
    pub prompt: String,
    pub completion: String,
}

#[derive(Clone)]
pub struct CompletionHistory {
    path: PathBuf,
}

impl CompletionHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record as a JSON line. Failures are reported on the
    /// tracing sink and never propagate to the request that triggered them.
    pub async fn append(&self, record: &CompletionRecord) {
        let line = match serde_json::to_string(record) {
            Ok(json) => format!("{}\n", json),
            Err(e) => {
                tracing::error!("Failed to serialize completion record: {}", e);
                return;
            }
        };

        let result = async {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await?;
            file.write_all(line.as_bytes()).await
        }
        .await;

        if let Err(e) = result {
            tracing::error!(
                path = %self.path.display(),
                "Failed to append to completion history: {}",
                e
            );
        }
    }

    /// Reads the full history contents.
    pub async fn read_all(&self) -> std::io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }
}
