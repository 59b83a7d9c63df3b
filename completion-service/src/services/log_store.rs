//! Append-only operational log backed by a flat text file.
//!
//! This file is part of the HTTP contract: `GET /logs` returns its full
//! contents, and each line follows
//! `[timestamp] [LEVEL] [source_ip] [request_id] message`, with the source
//! and request-id segments omitted for lines that are not tied to a request.

use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

#[derive(Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line. A failed append is reported on the tracing sink and
    /// never propagates to the request that triggered it.
    pub async fn append(
        &self,
        level: &str,
        source: Option<&str>,
        request_id: Option<&str>,
        message: &str,
    ) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let line = format_line(&timestamp, level, source, request_id, message);

        if let Err(e) = self.write_line(&line).await {
            tracing::error!(
                path = %self.path.display(),
                "Failed to append to operational log: {}",
                e
            );
        }
    }

    async fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await
    }

    /// Reads the full log contents.
    pub async fn read_all(&self) -> std::io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }
}

fn format_line(
    timestamp: &str,
    level: &str,
    source: Option<&str>,
    request_id: Option<&str>,
    message: &str,
) -> String {
    let mut line = format!("[{}] [{}]", timestamp, level);
    if let Some(source) = source {
        line.push_str(&format!(" [{}]", source));
    }
    if let Some(id) = request_id {
        line.push_str(&format!(" [{}]", id));
    }
    line.push(' ');
    line.push_str(message);
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line_carries_source_and_id() {
        let line = format_line(
            "2026-01-01T00:00:00.000Z",
            "INFO",
            Some("10.0.0.1"),
            Some("abc-123"),
            "Incoming request GET /",
        );
        assert_eq!(
            line,
            "[2026-01-01T00:00:00.000Z] [INFO] [10.0.0.1] [abc-123] Incoming request GET /\n"
        );
    }

    #[test]
    fn startup_line_omits_request_segments() {
        let line = format_line(
            "2026-01-01T00:00:00.000Z",
            "WARNING",
            None,
            None,
            "OLLAMA_URL is not set",
        );
        assert_eq!(
            line,
            "[2026-01-01T00:00:00.000Z] [WARNING] OLLAMA_URL is not set\n"
        );
    }

    #[tokio::test]
    async fn append_then_read_round_trips() {
        let dir = PathBuf::from(format!("target/log-store-test-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let store = LogStore::new(dir.join("app.log"));
        store.append("INFO", Some("127.0.0.1"), Some("rid"), "first").await;
        store.append("ERROR", Some("127.0.0.1"), Some("rid"), "second").await;

        let contents = store.read_all().await.unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[INFO] [127.0.0.1] [rid] first"));
        assert!(lines[1].ends_with("[ERROR] [127.0.0.1] [rid] second"));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn read_missing_file_is_an_error() {
        let store = LogStore::new("target/log-store-test-missing/does-not-exist.log");
        assert!(store.read_all().await.is_err());
    }
}
