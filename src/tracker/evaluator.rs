//! Periodic triggers for the tracker. Each [Ticker] sends one fixed command
//! into the tracker channel on a fixed cadence. Two instances run at a time:
//! the coarse policy ticker and the fine display ticker. They carry no state
//! of their own, the receiving side decides what a tick means.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{tracker::command::Command, utils::clock::Clock};

pub struct Ticker {
    command: Command,
    next: mpsc::Sender<Command>,
    shutdown: CancellationToken,
    interval: Duration,
    time_provider: Box<dyn Clock>,
}

impl Ticker {
    pub fn new(
        command: Command,
        next: mpsc::Sender<Command>,
        shutdown: CancellationToken,
        interval: Duration,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        Self {
            command,
            next,
            shutdown,
            interval,
            time_provider,
        }
    }

    /// Executes the ticker event loop. Returns once the shutdown token is
    /// cancelled or the receiving side goes away.
    pub async fn run(self) -> Result<()> {
        let mut tick_point = self.time_provider.instant();
        loop {
            tick_point += self.interval;

            tokio::select! {
                // Cancellation is idempotent: every ticker observes the same
                // token and simply stops looping.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.time_provider.sleep_until(tick_point) => ()
            }

            if self.next.send(self.command).await.is_err() {
                // The tracker loop is gone, nothing left to drive.
                debug!("Tick receiver closed, stopping {:?} ticker", self.command);
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use crate::utils::clock::DefaultClock;

    use super::*;

    #[tokio::test]
    async fn ticker_sends_until_cancelled() {
        let (sender, mut receiver) = mpsc::channel(16);
        let token = CancellationToken::new();
        let ticker = Ticker::new(
            Command::PolicyTick,
            sender,
            token.clone(),
            Duration::from_millis(5),
            Box::new(DefaultClock),
        );
        let handle = tokio::spawn(ticker.run());

        assert_eq!(receiver.recv().await, Some(Command::PolicyTick));

        token.cancel();
        // Cancelling again is a no-op.
        token.cancel();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn ticker_stops_when_receiver_is_dropped() {
        let (sender, receiver) = mpsc::channel(1);
        let ticker = Ticker::new(
            Command::DisplayTick,
            sender,
            CancellationToken::new(),
            Duration::from_millis(1),
            Box::new(DefaultClock),
        );
        drop(receiver);
        ticker.run().await.unwrap();
    }
}
