//! Interactive command source. Reads line commands from stdin and feeds the
//! tracker channel. This stands in for whatever presentation layer drives
//! the tracker (a tray menu, a hotkey daemon), which is deliberately outside
//! the core.

use anyhow::Result;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::tracker::command::{parse_command, Command};

pub struct StdinSource {
    next: mpsc::Sender<Command>,
    shutdown: CancellationToken,
}

impl StdinSource {
    pub fn new(next: mpsc::Sender<Command>, shutdown: CancellationToken) -> Self {
        Self { next, shutdown }
    }

    /// Reads commands until stdin closes, `quit` is entered, or shutdown is
    /// requested. Closing stdin ends the program the same way `quit` does.
    pub async fn run(self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = tokio::select! {
                _ = self.shutdown.cancelled() => return Ok(()),
                line = lines.next_line() => line?,
            };

            let Some(line) = line else {
                self.shutdown.cancel();
                return Ok(());
            };
            if line.trim().is_empty() {
                continue;
            }
            if line.trim().eq_ignore_ascii_case("quit") {
                self.shutdown.cancel();
                return Ok(());
            }

            match parse_command(&line) {
                Some(command) => {
                    debug!("Received command {command:?}");
                    if self.next.send(command).await.is_err() {
                        return Ok(());
                    }
                }
                None => {
                    warn!("Unknown command {line:?}");
                    println!(
                        "Unknown command. Try: in, out, break, resume, status, quit"
                    );
                }
            }
        }
    }
}
