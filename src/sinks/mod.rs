//! Sinks the tracker writes into.
//!  - [event_log::EventLog] appends user-visible lines to the time and
//!    session logs.
//!  - [weekly::WeeklyStore] keeps one net-duration line per day in a flat
//!    keyed file, replaced on every clock-out.
//!  - [notify::Notifier] delivers fire-and-forget user notifications.
//!
//! All sinks are best effort from the tracker's point of view: a failing
//! write is logged and swallowed, the state machine proceeds regardless.

pub mod event_log;
pub mod notify;
pub mod weekly;
