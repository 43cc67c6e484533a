//! Host clock and deferred-callback services backed by tokio

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tracing::debug;

use crate::reminder::{Clock, Generation, Scheduler, TimerHandle};

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Schedules countdowns as sleeping tasks that post their generation back
/// to the reminder loop
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    elapsed_tx: mpsc::UnboundedSender<Generation>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver the reminder loop drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Generation>) {
        let (elapsed_tx, elapsed_rx) = mpsc::unbounded_channel();
        (Self { elapsed_tx }, elapsed_rx)
    }
}

/// Running countdown task
#[derive(Debug)]
pub struct TokioTimerHandle(JoinHandle<()>);

impl TimerHandle for TokioTimerHandle {
    fn cancel(self) {
        self.0.abort();
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioTimerHandle;

    fn schedule_after(&mut self, delay: Duration, generation: Generation) -> TokioTimerHandle {
        let elapsed_tx = self.elapsed_tx.clone();
        TokioTimerHandle(tokio::spawn(async move {
            sleep(delay).await;
            debug!("Countdown {} elapsed after {:?}", generation, delay);
            if elapsed_tx.send(generation).is_err() {
                debug!("Reminder loop gone, dropping countdown {}", generation);
            }
        }))
    }
}
