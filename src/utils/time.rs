use chrono::{DateTime, Duration, Local, NaiveDate};

use crate::tracker::policy::{
    FIRST_BREAK_AFTER, FIRST_BREAK_CREDIT, SECOND_BREAK_AFTER, SECOND_BREAK_CREDIT,
};

/// Sums the break credits of every policy tier `work_duration` has reached.
/// Credits are cumulative: a duration past the second tier earns both.
pub fn required_break_credit(work_duration: Duration) -> Duration {
    let mut total = Duration::zero();

    if work_duration >= FIRST_BREAK_AFTER {
        total += FIRST_BREAK_CREDIT;
    }

    if work_duration >= SECOND_BREAK_AFTER {
        total += SECOND_BREAK_CREDIT;
    }

    total
}

/// Formats a duration as `<H>h <M>m`. Hours are total whole hours and can
/// exceed 24, minutes are the 0-59 remainder. Truncates, never rounds.
pub fn format_duration(duration: Duration) -> String {
    let hours = duration.num_hours();
    let minutes = (duration - Duration::hours(hours)).num_minutes();
    format!("{hours}h {minutes}m")
}

/// Formats a duration as a zero-padded `HH:MM:SS` countdown. Performs no
/// clamping, a negative input is the caller's problem.
pub fn format_countdown(duration: Duration) -> String {
    let hours = duration.num_hours();
    let minutes = (duration - Duration::hours(hours)).num_minutes();
    let seconds = (duration - Duration::hours(hours) - Duration::minutes(minutes)).num_seconds();
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Parses the `<H>h <M>m` format produced by [format_duration].
pub fn parse_duration(text: &str) -> Option<Duration> {
    let (hours, minutes) = text.trim().split_once(' ')?;
    let hours = hours.strip_suffix('h')?.parse::<i64>().ok()?;
    let minutes = minutes.strip_suffix('m')?.parse::<i64>().ok()?;
    Some(Duration::hours(hours) + Duration::minutes(minutes))
}

/// This is the standard way of converting a date to a string in stechuhr.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Week-of-year key, e.g. `2025-W34`.
pub fn week_key(date: NaiveDate) -> String {
    date.format("%Y-W%U").to_string()
}

/// Timestamp used for user-visible log lines.
pub fn timestamp(time: DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}
