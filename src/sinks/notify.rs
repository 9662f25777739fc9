use ansi_term::Colour;
#[cfg(test)]
use mockall::automock;

use crate::tracker::session::WorkStatus;

/// Fire-and-forget notification sink. Implementations must never fail the
/// caller; whatever happens to a lost popup is their problem.
#[cfg_attr(test, automock)]
pub trait Notifier {
    /// Shows a user-facing message.
    fn notify(&mut self, title: &str, message: &str);

    /// Signals that persistent UI affordances (status line, tray tooltip)
    /// should be refreshed.
    fn status_changed(&mut self, status: WorkStatus);
}

/// Prints notifications to the terminal. The leading newline breaks out of
/// the live status line drawn by the tracker loop.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, title: &str, message: &str) {
        println!(
            "\n{} {}",
            Colour::Yellow.bold().paint(format!("[{title}]")),
            message.replace('\n', " ")
        );
    }

    fn status_changed(&mut self, status: WorkStatus) {
        let colour = match status {
            WorkStatus::ClockedOut => Colour::Red,
            WorkStatus::ClockedIn => Colour::Green,
            WorkStatus::OnBreak => Colour::Yellow,
        };
        println!("\nStatus: {}", colour.bold().paint(status.label()));
    }
}
