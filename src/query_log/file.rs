// File-backed query log
// Stores one JSON object per line; ids resume after the largest one on disk

use async_trait::async_trait;
use std::path::Path;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{QueryLog, QueryLogEntry, QueryLogError};
use crate::logger;

struct Appender {
    file: File,
    next_id: u64,
}

pub struct FileQueryLog {
    appender: Mutex<Appender>,
}

impl FileQueryLog {
    /// Open or create the log file, creating parent directories as needed
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, QueryLogError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let last_id = Self::read_entries(path)
            .await?
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap_or(0);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        Ok(Self {
            appender: Mutex::new(Appender {
                file,
                next_id: last_id + 1,
            }),
        })
    }

    /// Read all well-formed entries; a missing file yields none
    pub async fn read_entries(path: impl AsRef<Path>) -> Result<Vec<QueryLogEntry>, QueryLogError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<QueryLogEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => logger::log_warning(&format!(
                    "Skipping malformed query log line {} in {}: {e}",
                    lineno + 1,
                    path.display()
                )),
            }
        }
        Ok(entries)
    }
}

#[async_trait]
impl QueryLog for FileQueryLog {
    async fn append(&self, question: &str, response: &str) -> Result<QueryLogEntry, QueryLogError> {
        let mut appender = self.appender.lock().await;

        // Consume the id even if the write fails so ids never repeat
        let entry = QueryLogEntry::new(appender.next_id, question, response);
        appender.next_id += 1;

        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        appender.file.write_all(line.as_bytes()).await?;
        appender.file.flush().await?;

        Ok(entry)
    }
}
