use std::{
    future::Future,
    io::SeekFrom,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::warn;

use crate::utils::time::{date_key, format_duration, parse_duration};

pub const WEEKLY_LOG_FILE: &str = "weekly_hours.txt";

/// One persisted day of net work time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyEntry {
    pub date: NaiveDate,
    pub net: Duration,
}

/// Interface for the per-day aggregate store.
///
/// An upsert for an existing date *replaces* the stored value instead of
/// adding to it: a day always reflects the most recently completed session.
/// Multiple clock-in/out cycles on the same day therefore overwrite each
/// other. Deliberate policy, do not "fix" it into accumulation.
pub trait WeeklyStore {
    fn upsert(&self, date: NaiveDate, net: Duration) -> impl Future<Output = Result<()>>;

    fn load(&self) -> impl Future<Output = Result<Vec<WeeklyEntry>>>;
}

/// The file realization of [WeeklyStore]. The backing store is a flat list
/// of `YYYY-MM-DD - <H>h <M>m` lines, rewritten wholesale on every upsert
/// under an exclusive lock.
pub struct FileWeeklyStore {
    path: PathBuf,
}

impl FileWeeklyStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(WEEKLY_LOG_FILE),
        }
    }

    fn parse_line(line: &str) -> Option<WeeklyEntry> {
        let (date, net) = line.split_once(" - ")?;
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
        let net = parse_duration(net)?;
        Some(WeeklyEntry { date, net })
    }

    async fn upsert_with_file(
        file: &mut File,
        date: NaiveDate,
        net: Duration,
    ) -> Result<()> {
        let mut content = String::new();
        file.read_to_string(&mut content).await?;

        let key = date_key(date);
        let fresh_line = format!("{key} - {}", format_duration(net));

        let mut lines = Vec::new();
        let mut found = false;
        for line in content.lines() {
            if line.starts_with(&key) {
                found = true;
                lines.push(fresh_line.clone());
            } else {
                lines.push(line.to_string());
            }
        }
        if !found {
            lines.push(fresh_line);
        }

        let mut buffer = lines.join("\n");
        buffer.push('\n');

        file.seek(SeekFrom::Start(0)).await?;
        file.set_len(0).await?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

impl WeeklyStore for FileWeeklyStore {
    async fn upsert(&self, date: NaiveDate, net: Duration) -> Result<()> {
        let mut file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = Self::upsert_with_file(&mut file, date, net).await;
        file.unlock_async().await?;
        result
    }

    async fn load(&self) -> Result<Vec<WeeklyEntry>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            match Self::parse_line(line) {
                Some(entry) => entries.push(entry),
                // Ignore illegal values. Might happen after shutdowns.
                None => warn!("Found illegal line in {:?}: {line}", self.path),
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[tokio::test]
    async fn upsert_replaces_instead_of_accumulating() -> Result<()> {
        let dir = tempdir()?;
        let store = FileWeeklyStore::new(dir.path());

        store.upsert(date(4), Duration::hours(3)).await?;
        store.upsert(date(5), Duration::hours(8)).await?;
        // Second session on the 4th overwrites the morning's total.
        store.upsert(date(4), Duration::hours(4)).await?;

        let entries = store.load().await?;
        assert_eq!(
            entries,
            vec![
                WeeklyEntry {
                    date: date(4),
                    net: Duration::hours(4),
                },
                WeeklyEntry {
                    date: date(5),
                    net: Duration::hours(8),
                },
            ]
        );

        let content = std::fs::read_to_string(dir.path().join(WEEKLY_LOG_FILE))?;
        assert_eq!(content, "2024-03-04 - 4h 0m\n2024-03-05 - 8h 0m\n");
        Ok(())
    }

    #[tokio::test]
    async fn load_skips_corrupted_lines() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(
            dir.path().join(WEEKLY_LOG_FILE),
            "2024-03-04 - 7h 30m\ngarbage\n",
        )?;

        let store = FileWeeklyStore::new(dir.path());
        let entries = store.load().await?;
        assert_eq!(
            entries,
            vec![WeeklyEntry {
                date: date(4),
                net: Duration::hours(7) + Duration::minutes(30),
            }]
        );
        Ok(())
    }

    #[tokio::test]
    async fn load_of_missing_file_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let store = FileWeeklyStore::new(dir.path());
        assert!(store.load().await?.is_empty());
        Ok(())
    }
}
