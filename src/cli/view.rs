//! Read-side views over the sink files.

use std::{collections::BTreeMap, path::Path};

use ansi_term::Colour;
use anyhow::Result;
use chrono::{Duration, NaiveDate};

use crate::{
    sinks::{
        event_log::TIME_LOG_FILE,
        weekly::{FileWeeklyStore, WeeklyEntry, WeeklyStore},
    },
    utils::time::{date_key, format_duration, week_key},
};

/// Prints the time log, optionally narrowed to a single day. Log lines
/// start with their timestamp, so day filtering is a prefix check.
pub async fn print_time_log(dir: &Path, date: Option<NaiveDate>) -> Result<()> {
    let path = dir.join(TIME_LOG_FILE);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            println!("No time log yet.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let prefix = date.map(date_key);
    for line in content.lines() {
        if let Some(prefix) = &prefix {
            if !line.starts_with(prefix) {
                continue;
            }
        }
        if line.contains("[AUTO]") {
            println!("{}", Colour::Cyan.paint(line));
        } else {
            println!("{line}");
        }
    }
    Ok(())
}

/// Prints recorded net hours grouped by week, with a per-week total.
pub async fn print_weekly_hours(dir: &Path) -> Result<()> {
    let entries = FileWeeklyStore::new(dir).load().await?;
    if entries.is_empty() {
        println!("No recorded hours yet.");
        return Ok(());
    }

    for (week, entries) in group_by_week(entries) {
        println!("{}", Colour::Green.bold().paint(week));
        let mut total = Duration::zero();
        for entry in &entries {
            total += entry.net;
            println!("  {} - {}", date_key(entry.date), format_duration(entry.net));
        }
        println!("  Total: {}", format_duration(total));
    }
    Ok(())
}

fn group_by_week(entries: Vec<WeeklyEntry>) -> BTreeMap<String, Vec<WeeklyEntry>> {
    let mut weeks: BTreeMap<String, Vec<WeeklyEntry>> = BTreeMap::new();
    for entry in entries {
        weeks.entry(week_key(entry.date)).or_default().push(entry);
    }
    for entries in weeks.values_mut() {
        entries.sort_by_key(|e| e.date);
    }
    weeks
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;

    fn entry(year: i32, month: u32, day: u32, hours: i64) -> WeeklyEntry {
        WeeklyEntry {
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            net: Duration::hours(hours),
        }
    }

    #[test]
    fn grouping_splits_at_week_boundaries() {
        // 2024-03-09 is a Saturday, 2024-03-10 a Sunday (start of a new %U
        // week).
        let weeks = group_by_week(vec![
            entry(2024, 3, 10, 8),
            entry(2024, 3, 8, 7),
            entry(2024, 3, 9, 4),
        ]);

        let keys: Vec<_> = weeks.keys().cloned().collect();
        assert_eq!(keys, vec!["2024-W09", "2024-W10"]);
        assert_eq!(weeks["2024-W09"].len(), 2);
        assert_eq!(weeks["2024-W09"][0].date.day(), 8);
        assert_eq!(weeks["2024-W10"].len(), 1);
    }
}
