//! The work-session state machine.
//!
//! [Session] holds the current status and timestamps and exposes the four
//! user transitions plus the two periodic checks. Operations never fail:
//! a call that is illegal for the current status is a silent no-op. Instead
//! of writing to sinks directly, every operation returns the [Effect]s it
//! produced and the tracker loop applies them, which keeps the machine
//! synchronous and trivially testable.

use chrono::{DateTime, Duration, Local, NaiveDate};

use crate::{
    tracker::{
        command::HostEvent,
        policy::{FIRST_BREAK_AFTER, MAX_WORK_HOURS, SECOND_BREAK_AFTER, TARGET_WORK_HOURS},
    },
    utils::time::{format_countdown, format_duration, required_break_credit},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStatus {
    ClockedOut,
    ClockedIn,
    OnBreak,
}

impl WorkStatus {
    pub fn label(&self) -> &'static str {
        match self {
            WorkStatus::ClockedOut => "Clocked Out",
            WorkStatus::ClockedIn => "Working",
            WorkStatus::OnBreak => "On Break",
        }
    }
}

/// A side effect requested by a session operation. The tracker loop routes
/// these to the log, weekly-aggregate and notification sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a line to the time log.
    TimeLog { text: String, automatic: bool },
    /// Append a line to the session (lock/logon) log.
    SessionLog { text: String },
    /// Upsert the net work time recorded for a day.
    WeeklyUpsert { date: NaiveDate, net: Duration },
    /// User-facing popup-style notification.
    Notify { title: String, message: String },
    /// Persistent UI affordances should be refreshed.
    StatusChanged(WorkStatus),
}

/// Read-only projection of the session for rendering. Plain data, the
/// presentation layer decides how to draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub status: WorkStatus,
    pub working_time: String,
    pub next_break: String,
    pub remaining: String,
}

pub struct Session {
    status: WorkStatus,
    clock_in_time: Option<DateTime<Local>>,
    break_start_time: Option<DateTime<Local>>,
    first_break_taken: bool,
    second_break_taken: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            status: WorkStatus::ClockedOut,
            clock_in_time: None,
            break_start_time: None,
            first_break_taken: false,
            second_break_taken: false,
        }
    }

    pub fn status(&self) -> WorkStatus {
        self.status
    }

    /// Starts a work session. Legal from any status: a repeated clock-in
    /// resets the clock-in time and the break flags, matching the reference
    /// behavior of the tracker this replaces.
    pub fn clock_in(&mut self, now: DateTime<Local>, automatic: bool) -> Vec<Effect> {
        self.status = WorkStatus::ClockedIn;
        self.clock_in_time = Some(now);
        self.break_start_time = None;
        self.first_break_taken = false;
        self.second_break_taken = false;

        let mut effects = vec![
            Effect::TimeLog {
                text: "CLOCK IN".into(),
                automatic,
            },
            Effect::StatusChanged(WorkStatus::ClockedIn),
        ];
        if !automatic {
            effects.push(Effect::Notify {
                title: "Time Tracker".into(),
                message: "Successfully clocked in!".into(),
            });
        }
        effects
    }

    /// Ends the work session, deducting the mandatory break credit earned by
    /// the raw duration. No-op when already clocked out.
    pub fn clock_out(&mut self, now: DateTime<Local>, automatic: bool) -> Vec<Effect> {
        if self.status == WorkStatus::ClockedOut {
            return Vec::new();
        }
        let Some(clock_in_time) = self.clock_in_time else {
            return Vec::new();
        };

        let raw = now - clock_in_time;
        let credit = required_break_credit(raw);
        let net = raw - credit;

        let mut effects = Vec::new();
        if credit > Duration::zero() {
            effects.push(Effect::TimeLog {
                text: format!("AUTO BREAKS ADDED: {}", format_duration(credit)),
                automatic: true,
            });
        }

        self.status = WorkStatus::ClockedOut;
        self.break_start_time = None;

        effects.push(Effect::TimeLog {
            text: format!("CLOCK OUT - Net Work Time: {}", format_duration(net)),
            automatic,
        });
        effects.push(Effect::WeeklyUpsert {
            date: now.date_naive(),
            net,
        });
        effects.push(Effect::StatusChanged(WorkStatus::ClockedOut));
        if !automatic {
            effects.push(Effect::Notify {
                title: "Time Tracker".into(),
                message: format!(
                    "Successfully clocked out!\nNet work time: {}",
                    format_duration(net)
                ),
            });
        }
        effects
    }

    /// No-op unless currently clocked in.
    pub fn start_break(&mut self, now: DateTime<Local>, automatic: bool) -> Vec<Effect> {
        if self.status != WorkStatus::ClockedIn {
            return Vec::new();
        }

        self.status = WorkStatus::OnBreak;
        self.break_start_time = Some(now);

        let mut effects = vec![
            Effect::TimeLog {
                text: "BREAK START".into(),
                automatic,
            },
            Effect::StatusChanged(WorkStatus::OnBreak),
        ];
        if !automatic {
            effects.push(Effect::Notify {
                title: "Time Tracker".into(),
                message: "Break started!".into(),
            });
        }
        effects
    }

    /// No-op unless currently on break. Unlike the other transitions the
    /// confirmation is always shown.
    pub fn end_break(&mut self, now: DateTime<Local>) -> Vec<Effect> {
        if self.status != WorkStatus::OnBreak {
            return Vec::new();
        }
        let Some(break_start_time) = self.break_start_time else {
            return Vec::new();
        };

        let break_duration = now - break_start_time;
        self.status = WorkStatus::ClockedIn;
        self.break_start_time = None;

        vec![
            Effect::TimeLog {
                text: format!(
                    "BREAK END - Duration: {}",
                    format_duration(break_duration)
                ),
                automatic: false,
            },
            Effect::StatusChanged(WorkStatus::ClockedIn),
            Effect::Notify {
                title: "Time Tracker".into(),
                message: format!(
                    "Break ended!\nBreak duration: {}",
                    format_duration(break_duration)
                ),
            },
        ]
    }

    /// Periodic policy check: reminds about mandatory breaks once per tier.
    /// The flags are sticky until the next clock-in, so a tier reminds at
    /// most once per session. Reminders never force a transition.
    pub fn check_auto_breaks(&mut self, now: DateTime<Local>) -> Vec<Effect> {
        if self.status != WorkStatus::ClockedIn {
            return Vec::new();
        }
        let Some(clock_in_time) = self.clock_in_time else {
            return Vec::new();
        };

        let worked = now - clock_in_time;
        let mut effects = Vec::new();

        if !self.first_break_taken && worked >= FIRST_BREAK_AFTER {
            self.first_break_taken = true;
            effects.push(Effect::Notify {
                title: "Break Reminder".into(),
                message: "Time for mandatory break!\n30-minute break required after 6 hours."
                    .into(),
            });
        }

        if !self.second_break_taken && worked >= SECOND_BREAK_AFTER {
            self.second_break_taken = true;
            effects.push(Effect::Notify {
                title: "Second Break Reminder".into(),
                message: "Time for second break!\n15-minute break required after 9 hours.".into(),
            });
        }

        effects
    }

    /// Periodic policy check: forces an automatic clock-out once the maximum
    /// daily duration is reached, then warns the user.
    pub fn check_max_hours(&mut self, now: DateTime<Local>) -> Vec<Effect> {
        if self.status == WorkStatus::ClockedOut {
            return Vec::new();
        }
        let Some(clock_in_time) = self.clock_in_time else {
            return Vec::new();
        };

        if now - clock_in_time < MAX_WORK_HOURS {
            return Vec::new();
        }

        let mut effects = self.clock_out(now, true);
        effects.push(Effect::Notify {
            title: "Auto Clock Out".into(),
            message: "Automatic clock out after 10 hours!\nFor your health and legal compliance."
                .into(),
        });
        effects
    }

    /// Forwards a host session event to the session log. A logoff also
    /// clocks out automatically.
    pub fn host_event(&mut self, now: DateTime<Local>, event: HostEvent) -> Vec<Effect> {
        let text = match event {
            HostEvent::Lock => "SCREEN LOCKED",
            HostEvent::Unlock => "SCREEN UNLOCKED",
            HostEvent::Logoff => "USER LOGOFF",
            HostEvent::Logon => "USER LOGON",
        };
        let mut effects = vec![Effect::SessionLog { text: text.into() }];
        if event == HostEvent::Logoff && self.status != WorkStatus::ClockedOut {
            effects.extend(self.clock_out(now, true));
        }
        effects
    }

    /// Read-only projection for rendering. Working time subtracts only a
    /// currently open break; closed breaks are captured through the credit
    /// deduction at clock-out.
    pub fn project_display(&self, now: DateTime<Local>) -> DisplaySnapshot {
        let Some(clock_in_time) = self.clock_in_time.filter(|_| self.status != WorkStatus::ClockedOut)
        else {
            return DisplaySnapshot {
                status: WorkStatus::ClockedOut,
                working_time: "00:00:00".into(),
                next_break: "--:--:--".into(),
                remaining: format_countdown(TARGET_WORK_HOURS),
            };
        };

        let worked = now - clock_in_time;

        let working_time = match (self.status, self.break_start_time) {
            (WorkStatus::OnBreak, Some(break_start)) => {
                format_countdown(worked - (now - break_start))
            }
            _ => format_countdown(worked),
        };

        let next_break = if !self.first_break_taken && worked < FIRST_BREAK_AFTER {
            format_countdown(FIRST_BREAK_AFTER - worked)
        } else if !self.second_break_taken && worked < SECOND_BREAK_AFTER {
            format_countdown(SECOND_BREAK_AFTER - worked)
        } else {
            "No more breaks".into()
        };

        let net_worked = worked - required_break_credit(worked);
        let remaining_time = TARGET_WORK_HOURS - net_worked;
        let remaining = if remaining_time > Duration::zero() {
            format_countdown(remaining_time)
        } else {
            "00:00:00 (Overtime!)".into()
        };

        DisplaySnapshot {
            status: self.status,
            working_time,
            next_break,
            remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local, TimeZone};

    use super::*;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
    }

    fn upserts(effects: &[Effect]) -> Vec<(NaiveDate, Duration)> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::WeeklyUpsert { date, net } => Some((*date, *net)),
                _ => None,
            })
            .collect()
    }

    fn notifications<'a>(effects: &'a [Effect]) -> Vec<&'a str> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Notify { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    fn log_lines<'a>(effects: &'a [Effect]) -> Vec<&'a str> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::TimeLog { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn short_day_has_no_break_credit() {
        let mut session = Session::new();
        session.clock_in(t0(), false);
        let effects = session.clock_out(t0() + Duration::hours(5), false);

        assert_eq!(session.status(), WorkStatus::ClockedOut);
        assert_eq!(
            log_lines(&effects),
            vec!["CLOCK OUT - Net Work Time: 5h 0m"]
        );
        assert_eq!(
            upserts(&effects),
            vec![(t0().date_naive(), Duration::hours(5))]
        );
    }

    #[test]
    fn seven_hours_earns_first_tier_credit() {
        let mut session = Session::new();
        session.clock_in(t0(), false);
        let effects = session.clock_out(t0() + Duration::hours(7), false);

        assert_eq!(
            log_lines(&effects),
            vec![
                "AUTO BREAKS ADDED: 0h 30m",
                "CLOCK OUT - Net Work Time: 6h 30m"
            ]
        );
        assert_eq!(
            upserts(&effects),
            vec![(
                t0().date_naive(),
                Duration::hours(6) + Duration::minutes(30)
            )]
        );
    }

    #[test]
    fn long_day_earns_both_credits() {
        let mut session = Session::new();
        session.clock_in(t0(), false);
        let effects =
            session.clock_out(t0() + Duration::hours(9) + Duration::minutes(30), false);

        assert_eq!(
            log_lines(&effects),
            vec![
                "AUTO BREAKS ADDED: 0h 45m",
                "CLOCK OUT - Net Work Time: 8h 45m"
            ]
        );
    }

    #[test]
    fn double_clock_out_is_a_no_op() {
        let mut session = Session::new();
        session.clock_in(t0(), false);
        let first = session.clock_out(t0() + Duration::hours(4), false);
        let second = session.clock_out(t0() + Duration::hours(4), false);

        assert_eq!(upserts(&first).len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn break_transitions_are_guarded() {
        let mut session = Session::new();
        // Cannot start a break while clocked out.
        assert!(session.start_break(t0(), false).is_empty());
        // Cannot end a break that never started.
        assert!(session.end_break(t0()).is_empty());

        session.clock_in(t0(), false);
        let started = session.start_break(t0() + Duration::hours(1), false);
        assert_eq!(session.status(), WorkStatus::OnBreak);
        assert_eq!(log_lines(&started), vec!["BREAK START"]);

        // A second start while already on break changes nothing.
        assert!(session
            .start_break(t0() + Duration::hours(1), false)
            .is_empty());

        let ended = session.end_break(t0() + Duration::hours(1) + Duration::minutes(20));
        assert_eq!(session.status(), WorkStatus::ClockedIn);
        assert_eq!(log_lines(&ended), vec!["BREAK END - Duration: 0h 20m"]);
        // The end-break confirmation is unconditional.
        assert_eq!(notifications(&ended), vec!["Time Tracker"]);
    }

    #[test]
    fn break_reminders_fire_once_per_tier() {
        let mut session = Session::new();
        session.clock_in(t0(), false);

        assert!(session
            .check_auto_breaks(t0() + Duration::hours(5))
            .is_empty());

        let first = session.check_auto_breaks(t0() + Duration::hours(6));
        assert_eq!(notifications(&first), vec!["Break Reminder"]);
        // The reminder does not force a break.
        assert_eq!(session.status(), WorkStatus::ClockedIn);

        // Sticky flag: no repeat half an hour later.
        assert!(session
            .check_auto_breaks(t0() + Duration::hours(6) + Duration::minutes(30))
            .is_empty());

        let second = session.check_auto_breaks(t0() + Duration::hours(9));
        assert_eq!(notifications(&second), vec!["Second Break Reminder"]);
    }

    #[test]
    fn a_late_check_reminds_both_tiers_at_once() {
        let mut session = Session::new();
        session.clock_in(t0(), false);
        let effects = session.check_auto_breaks(t0() + Duration::hours(9));
        assert_eq!(
            notifications(&effects),
            vec!["Break Reminder", "Second Break Reminder"]
        );
    }

    #[test]
    fn max_hours_forces_automatic_clock_out() {
        let mut session = Session::new();
        session.clock_in(t0(), false);

        assert!(session.check_max_hours(t0() + Duration::hours(9)).is_empty());

        let effects = session.check_max_hours(t0() + Duration::hours(10));
        assert_eq!(session.status(), WorkStatus::ClockedOut);
        // Net applies both credits, and only the warning fires: the clock-out
        // confirmation is suppressed because the transition is automatic.
        assert_eq!(
            log_lines(&effects),
            vec![
                "AUTO BREAKS ADDED: 0h 45m",
                "CLOCK OUT - Net Work Time: 9h 15m"
            ]
        );
        assert_eq!(notifications(&effects), vec!["Auto Clock Out"]);

        // Once clocked out the check is inert.
        assert!(session
            .check_max_hours(t0() + Duration::hours(11))
            .is_empty());
    }

    #[test]
    fn same_day_sessions_overwrite_the_aggregate() {
        let mut session = Session::new();
        session.clock_in(t0(), false);
        let first = session.clock_out(t0() + Duration::hours(3), false);
        session.clock_in(t0() + Duration::hours(4), false);
        let second = session.clock_out(t0() + Duration::hours(8), false);

        // Each clock-out pushes its own net for the same date key. The sink
        // replaces rather than accumulates, so the last one wins.
        assert_eq!(
            upserts(&first),
            vec![(t0().date_naive(), Duration::hours(3))]
        );
        assert_eq!(
            upserts(&second),
            vec![(t0().date_naive(), Duration::hours(4))]
        );
    }

    #[test]
    fn reentrant_clock_in_resets_the_session() {
        let mut session = Session::new();
        session.clock_in(t0(), false);
        session.check_auto_breaks(t0() + Duration::hours(6));

        // Clocking in again while already clocked in is not guarded. It
        // restarts the session and clears the reminder flags.
        session.clock_in(t0() + Duration::hours(7), false);
        let effects = session.clock_out(t0() + Duration::hours(9), false);
        assert_eq!(
            log_lines(&effects),
            vec!["CLOCK OUT - Net Work Time: 2h 0m"]
        );
    }

    #[test]
    fn logoff_clocks_out_automatically() {
        let mut session = Session::new();
        session.clock_in(t0(), false);

        let lock = session.host_event(t0() + Duration::hours(1), HostEvent::Lock);
        assert_eq!(
            lock,
            vec![Effect::SessionLog {
                text: "SCREEN LOCKED".into()
            }]
        );
        assert_eq!(session.status(), WorkStatus::ClockedIn);

        let logoff = session.host_event(t0() + Duration::hours(2), HostEvent::Logoff);
        assert_eq!(session.status(), WorkStatus::ClockedOut);
        assert!(matches!(
            logoff.first(),
            Some(Effect::SessionLog { text }) if text == "USER LOGOFF"
        ));
        assert_eq!(upserts(&logoff).len(), 1);
        // No confirmation popup for the automatic clock-out.
        assert!(notifications(&logoff).is_empty());

        // A second logoff only logs.
        let again = session.host_event(t0() + Duration::hours(3), HostEvent::Logoff);
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn display_placeholders_when_clocked_out() {
        let session = Session::new();
        let snapshot = session.project_display(t0());
        assert_eq!(snapshot.status, WorkStatus::ClockedOut);
        assert_eq!(snapshot.working_time, "00:00:00");
        assert_eq!(snapshot.next_break, "--:--:--");
        assert_eq!(snapshot.remaining, "08:00:00");
    }

    #[test]
    fn display_counts_down_to_the_next_break() {
        let mut session = Session::new();
        session.clock_in(t0(), false);

        let snapshot = session.project_display(t0() + Duration::hours(2));
        assert_eq!(snapshot.status, WorkStatus::ClockedIn);
        assert_eq!(snapshot.working_time, "02:00:00");
        assert_eq!(snapshot.next_break, "04:00:00");
        assert_eq!(snapshot.remaining, "06:00:00");

        // After the first tier the countdown targets the second one.
        session.check_auto_breaks(t0() + Duration::hours(6));
        let snapshot = session.project_display(t0() + Duration::hours(7));
        assert_eq!(snapshot.next_break, "02:00:00");
        // 7h elapsed minus 30m credit leaves 1h30m of the 8h target.
        assert_eq!(snapshot.remaining, "01:30:00");

        session.check_auto_breaks(t0() + Duration::hours(9));
        let snapshot = session.project_display(t0() + Duration::hours(9));
        assert_eq!(snapshot.next_break, "No more breaks");
        assert_eq!(snapshot.remaining, "00:00:00 (Overtime!)");
    }

    #[test]
    fn display_excludes_only_the_open_break() {
        let mut session = Session::new();
        session.clock_in(t0(), false);
        session.start_break(t0() + Duration::hours(2), false);

        // 3h since clock-in, 1h of it on the current break.
        let snapshot = session.project_display(t0() + Duration::hours(3));
        assert_eq!(snapshot.status, WorkStatus::OnBreak);
        assert_eq!(snapshot.working_time, "02:00:00");

        // Once the break ends the time is counted again.
        session.end_break(t0() + Duration::hours(3));
        let snapshot = session.project_display(t0() + Duration::hours(4));
        assert_eq!(snapshot.working_time, "04:00:00");
    }
}
