use std::{
    future::Future,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::{DateTime, Local};
use fs4::tokio::AsyncFileExt;
use tokio::{fs::File, io::AsyncWriteExt};

use crate::utils::time::timestamp;

pub const TIME_LOG_FILE: &str = "time_log.txt";
pub const SESSION_LOG_FILE: &str = "session_log.txt";

/// Interface for the append-only event logs. One line per call, never
/// reordered.
pub trait EventLog {
    /// Appends a clock/break event to the time log. Automatic events are
    /// prefixed with `[AUTO]`.
    fn log_time_entry(
        &self,
        now: DateTime<Local>,
        text: &str,
        automatic: bool,
    ) -> impl Future<Output = Result<()>>;

    /// Appends a host session event (lock, logon, ...) to the session log.
    fn log_session_event(
        &self,
        now: DateTime<Local>,
        text: &str,
    ) -> impl Future<Output = Result<()>>;
}

/// File-backed [EventLog] writing plain text lines next to the other
/// application data.
pub struct FileEventLog {
    time_log_path: PathBuf,
    session_log_path: PathBuf,
}

impl FileEventLog {
    pub fn new(dir: &Path) -> Self {
        Self {
            time_log_path: dir.join(TIME_LOG_FILE),
            session_log_path: dir.join(SESSION_LOG_FILE),
        }
    }

    async fn append_line(path: &Path, line: String) -> Result<()> {
        let mut file = File::options()
            .append(true)
            .create(true)
            .open(path)
            .await?;
        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = Self::append_with_file(&mut file, line).await;
        file.unlock_async().await?;
        result
    }

    async fn append_with_file(file: &mut File, line: String) -> Result<()> {
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok(())
    }
}

impl EventLog for FileEventLog {
    async fn log_time_entry(&self, now: DateTime<Local>, text: &str, automatic: bool) -> Result<()> {
        let prefix = if automatic { "[AUTO] " } else { "" };
        let line = format!("{} - {prefix}{text}", timestamp(now));
        Self::append_line(&self.time_log_path, line).await
    }

    async fn log_session_event(&self, now: DateTime<Local>, text: &str) -> Result<()> {
        let line = format!("{} - {text}", timestamp(now));
        Self::append_line(&self.session_log_path, line).await
    }
}
