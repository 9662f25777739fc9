//! Break policy constants. These are deliberately compile-time values, not
//! runtime configuration: the tiers mirror statutory working-hours rules.

use std::time::Duration as StdDuration;

use chrono::Duration;

/// Working this long makes the first mandatory break due.
pub const FIRST_BREAK_AFTER: Duration = Duration::hours(6);
/// Credit deducted for the first mandatory break.
pub const FIRST_BREAK_CREDIT: Duration = Duration::minutes(30);

/// Working this long makes the second mandatory break due.
pub const SECOND_BREAK_AFTER: Duration = Duration::hours(9);
/// Credit deducted for the second mandatory break.
pub const SECOND_BREAK_CREDIT: Duration = Duration::minutes(15);

/// Total clocked-in time after which the tracker clocks out on its own.
pub const MAX_WORK_HOURS: Duration = Duration::hours(10);

/// The nominal working day, used for the remaining-time projection.
pub const TARGET_WORK_HOURS: Duration = Duration::hours(8);

/// Cadence of the mandatory-break and max-hours checks.
pub const POLICY_CHECK_INTERVAL: StdDuration = StdDuration::from_secs(60);

/// Cadence of display refreshes.
pub const DISPLAY_REFRESH_INTERVAL: StdDuration = StdDuration::from_secs(1);
