//! The tracker event loop, the owner of all session state.
//!
//! Wiring mirrors a small daemon: producers (interactive input, the two
//! periodic tickers) push [Command]s into one channel, a single consumer
//! task applies them to the [Session] and routes the resulting effects to
//! the sinks. The channel is the exclusion domain: no two operations ever
//! observe the session concurrently.

use std::{io::Write, path::PathBuf};

use anyhow::Result;
use command::Command;
use evaluator::Ticker;
use host::StdinSource;
use session::{DisplaySnapshot, Effect, Session};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::{
    sinks::{
        event_log::{EventLog, FileEventLog},
        notify::{ConsoleNotifier, Notifier},
        weekly::{FileWeeklyStore, WeeklyStore},
    },
    utils::clock::{Clock, DefaultClock},
};

pub mod command;
pub mod evaluator;
pub mod host;
pub mod policy;
pub mod session;
pub mod shutdown;

/// Represents the starting point for the tracker.
pub async fn start_tracker(dir: PathBuf) -> Result<()> {
    std::fs::create_dir_all(&dir)?;

    let (sender, receiver) = mpsc::channel::<Command>(16);
    let shutdown_token = CancellationToken::new();

    let policy_ticker = Ticker::new(
        Command::PolicyTick,
        sender.clone(),
        shutdown_token.clone(),
        policy::POLICY_CHECK_INTERVAL,
        Box::new(DefaultClock),
    );
    let display_ticker = Ticker::new(
        Command::DisplayTick,
        sender.clone(),
        shutdown_token.clone(),
        policy::DISPLAY_REFRESH_INTERVAL,
        Box::new(DefaultClock),
    );
    let input = StdinSource::new(sender, shutdown_token.clone());

    let tracker = Tracker::new(
        receiver,
        FileEventLog::new(&dir),
        FileWeeklyStore::new(&dir),
        ConsoleNotifier,
        Box::new(DefaultClock),
    );

    println!("stechuhr is running. Commands: in, out, break, resume, status, quit");

    let (_, policy_result, display_result, input_result, tracker_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token),
        policy_ticker.run(),
        display_ticker.run(),
        input.run(),
        tracker.run(),
    );

    if let Err(e) = policy_result {
        error!("Policy ticker got an error {e:?}");
    }
    if let Err(e) = display_result {
        error!("Display ticker got an error {e:?}");
    }
    if let Err(e) = input_result {
        error!("Input source got an error {e:?}");
    }
    if let Err(e) = tracker_result {
        error!("Tracker loop got an error {e:?}");
    }

    Ok(())
}

/// Consumes the command channel and owns the [Session].
pub struct Tracker<L, W, N> {
    receiver: mpsc::Receiver<Command>,
    session: Session,
    event_log: L,
    weekly: W,
    notifier: N,
    time_provider: Box<dyn Clock>,
}

impl<L: EventLog, W: WeeklyStore, N: Notifier> Tracker<L, W, N> {
    pub fn new(
        receiver: mpsc::Receiver<Command>,
        event_log: L,
        weekly: W,
        notifier: N,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        Self {
            receiver,
            session: Session::new(),
            event_log,
            weekly,
            notifier,
            time_provider,
        }
    }

    /// Executes the tracker event loop. Ends once every producer has
    /// dropped its sender.
    pub async fn run(mut self) -> Result<()> {
        while let Some(command) = self.receiver.recv().await {
            let now = self.time_provider.time();

            match command {
                Command::DisplayTick => {
                    render_status_line(&self.session.project_display(now));
                }
                Command::ShowStatus => {
                    print_snapshot(&self.session.project_display(now));
                }
                command => {
                    debug!("Processing command {command:?}");
                    let effects = match command {
                        Command::ClockIn => self.session.clock_in(now, false),
                        Command::ClockOut => self.session.clock_out(now, false),
                        Command::StartBreak => self.session.start_break(now, false),
                        Command::EndBreak => self.session.end_break(now),
                        Command::PolicyTick => {
                            let mut effects = self.session.check_auto_breaks(now);
                            effects.extend(self.session.check_max_hours(now));
                            effects
                        }
                        Command::Host(event) => self.session.host_event(now, event),
                        Command::DisplayTick | Command::ShowStatus => unreachable!(),
                    };
                    self.apply(now, effects).await;
                }
            }
        }

        self.receiver.close();
        Ok(())
    }

    /// Routes effects to the sinks. Sink failures are absorbed here: the
    /// session already moved on, a lost line must not stall the next tick.
    async fn apply(&mut self, now: chrono::DateTime<chrono::Local>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::TimeLog { text, automatic } => {
                    if let Err(e) = self.event_log.log_time_entry(now, &text, automatic).await {
                        warn!("Failed to write time log entry {text:?}: {e:?}");
                    }
                }
                Effect::SessionLog { text } => {
                    if let Err(e) = self.event_log.log_session_event(now, &text).await {
                        warn!("Failed to write session log entry {text:?}: {e:?}");
                    }
                }
                Effect::WeeklyUpsert { date, net } => {
                    if let Err(e) = self.weekly.upsert(date, net).await {
                        warn!("Failed to upsert weekly hours for {date}: {e:?}");
                    }
                }
                Effect::Notify { title, message } => {
                    self.notifier.notify(&title, &message);
                }
                Effect::StatusChanged(status) => {
                    self.notifier.status_changed(status);
                }
            }
        }
    }
}

fn render_status_line(snapshot: &DisplaySnapshot) {
    let mut out = std::io::stdout();
    let _ = write!(
        out,
        "\r{} | Working: {} | Next break: {} | Remaining: {}   ",
        snapshot.status.label(),
        snapshot.working_time,
        snapshot.next_break,
        snapshot.remaining,
    );
    let _ = out.flush();
}

fn print_snapshot(snapshot: &DisplaySnapshot) {
    println!("\nStatus:     {}", snapshot.status.label());
    println!("Working:    {}", snapshot.working_time);
    println!("Next break: {}", snapshot.next_break);
    println!("Remaining:  {}", snapshot.remaining);
}
