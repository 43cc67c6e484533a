//! Reminder loop background task
//!
//! The loop exclusively owns the [`ReminderFlow`]. Countdown elapses arrive
//! from the [`TokioScheduler`] and user requests arrive as [`Command`]s, both
//! handled one at a time on this task. Derived state is published through a
//! watch channel for the HTTP layer to read.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::{
    error::ReminderError,
    reminder::{
        Clock, Generation, NextAction, Notice, PendingResolution, ReminderClock, ReminderEvent,
        ReminderFlow, ResolutionChoice,
    },
    services::{Notifier, TokioScheduler},
    state::TimerState,
};

const COMMAND_BUFFER: usize = 32;

/// Requests from the presentation layer
#[derive(Debug)]
pub enum Command {
    Start {
        minutes: i64,
        reply: oneshot::Sender<Result<Outcome, ReminderError>>,
    },
    Stop {
        reply: oneshot::Sender<Outcome>,
    },
    Resolve {
        choice: ResolutionChoice,
        reply: oneshot::Sender<Result<Outcome, ReminderError>>,
    },
}

/// Result of a command: what to do next and the notice that was shown, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(flatten)]
    pub action: NextAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSnapshot {
    pub timer: TimerState,
    pub pending: Option<PendingResolution>,
    pub last_fired: Option<ReminderEvent>,
}

/// Errors seen by callers of [`ReminderHandle`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error(transparent)]
    Reminder(#[from] ReminderError),

    #[error("reminder loop is not running")]
    Unavailable,
}

/// Cloneable client for the reminder loop
#[derive(Debug, Clone)]
pub struct ReminderHandle {
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<ReminderSnapshot>,
}

impl ReminderHandle {
    /// Start a reminder cycle of `minutes`
    pub async fn start(&self, minutes: i64) -> Result<Outcome, ControlError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Start { minutes, reply }).await?;
        Ok(rx.await.map_err(|_| ControlError::Unavailable)??)
    }

    /// Stop the timer and dismiss any pending reminder
    pub async fn stop(&self) -> Result<Outcome, ControlError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Stop { reply }).await?;
        rx.await.map_err(|_| ControlError::Unavailable)
    }

    /// Answer the pending reminder
    pub async fn resolve(&self, choice: ResolutionChoice) -> Result<Outcome, ControlError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Resolve { choice, reply }).await?;
        Ok(rx.await.map_err(|_| ControlError::Unavailable)??)
    }

    /// Latest published state
    pub fn snapshot(&self) -> ReminderSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver that wakes on every state change
    pub fn subscribe(&self) -> watch::Receiver<ReminderSnapshot> {
        self.snapshot.clone()
    }

    async fn send(&self, command: Command) -> Result<(), ControlError> {
        self.commands.send(command).await.map_err(|e| {
            error!("Failed to send reminder command: {}", e);
            ControlError::Unavailable
        })
    }
}

/// Spawn the reminder loop on the current runtime
pub fn spawn_reminder_loop<C, N>(clock: C, notifier: N) -> (ReminderHandle, JoinHandle<()>)
where
    C: Clock + Send + 'static,
    N: Notifier,
{
    let (scheduler, elapsed_rx) = TokioScheduler::channel();
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(ReminderSnapshot::default());

    let flow = ReminderFlow::new(ReminderClock::new(clock, scheduler));
    let task = tokio::spawn(reminder_loop_task(
        flow,
        elapsed_rx,
        command_rx,
        snapshot_tx,
        notifier,
    ));

    let handle = ReminderHandle {
        commands: command_tx,
        snapshot: snapshot_rx,
    };
    (handle, task)
}

/// Background task that owns the reminder flow until every handle is dropped
pub async fn reminder_loop_task<C, N>(
    flow: ReminderFlow<C, TokioScheduler>,
    mut elapsed_rx: mpsc::UnboundedReceiver<Generation>,
    mut commands: mpsc::Receiver<Command>,
    snapshot_tx: watch::Sender<ReminderSnapshot>,
    notifier: N,
) where
    C: Clock,
    N: Notifier,
{
    info!("Starting reminder loop task");
    let mut state = LoopState::new(flow, snapshot_tx, notifier);

    loop {
        tokio::select! {
            Some(generation) = elapsed_rx.recv() => state.elapsed(generation),

            command = commands.recv() => match command {
                Some(command) => state.handle(command),
                None => {
                    info!("All reminder handles dropped, stopping reminder loop");
                    state.flow.stop();
                    break;
                }
            },
        }
    }
}

struct LoopState<C, N> {
    flow: ReminderFlow<C, TokioScheduler>,
    snapshot_tx: watch::Sender<ReminderSnapshot>,
    fired_rx: mpsc::UnboundedReceiver<ReminderEvent>,
    notifier: N,
}

impl<C: Clock, N: Notifier> LoopState<C, N> {
    fn new(
        mut flow: ReminderFlow<C, TokioScheduler>,
        snapshot_tx: watch::Sender<ReminderSnapshot>,
        notifier: N,
    ) -> Self {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        flow.on_fire(move |event| {
            // The receiver lives as long as the loop.
            let _ = fired_tx.send(*event);
        });
        Self {
            flow,
            snapshot_tx,
            fired_rx,
            notifier,
        }
    }

    fn elapsed(&mut self, generation: Generation) {
        if let Some(event) = self.flow.fire(generation) {
            let pending = self.flow.on_reminder_fired(event);
            self.notifier.alert(&pending);
            self.publish();
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Start { minutes, reply } => {
                let result = self.flow.start(minutes).map(|action| {
                    let notice = match action {
                        NextAction::ScheduleNotice { next_fire_at } => {
                            let interval = self.flow.clock().remaining_interval().unwrap_or_default();
                            Notice::started(interval, next_fire_at)
                        }
                        NextAction::ReturnToIdle => Notice::stopped(),
                    };
                    Outcome { action, notice: Some(notice) }
                });
                self.respond(reply, result);
            }
            Command::Stop { reply } => {
                // Stopping an idle timer is silent.
                let was_active = self.flow.is_active();
                let outcome = Outcome {
                    action: self.flow.stop(),
                    notice: was_active.then(Notice::stopped),
                };
                match &outcome.notice {
                    Some(notice) => self.notifier.notify(notice),
                    None => debug!("Stop requested while idle, nothing to announce"),
                }
                self.publish();
                if reply.send(outcome).is_err() {
                    debug!("Stop requester went away before the reply");
                }
            }
            Command::Resolve { choice, reply } => {
                let result = self.flow.resolve(choice).map(|action| {
                    let notice = match action {
                        NextAction::ScheduleNotice { next_fire_at } => {
                            Notice::next_reminder(next_fire_at)
                        }
                        NextAction::ReturnToIdle => Notice::stopped(),
                    };
                    Outcome { action, notice: Some(notice) }
                });
                self.respond(reply, result);
            }
        }
    }

    /// Publish, then reply, so callers always observe their own change
    fn respond(
        &mut self,
        reply: oneshot::Sender<Result<Outcome, ReminderError>>,
        result: Result<Outcome, ReminderError>,
    ) {
        match &result {
            Ok(outcome) => {
                if let Some(notice) = &outcome.notice {
                    self.notifier.notify(notice);
                }
                self.publish();
            }
            Err(e) => warn!("Reminder command rejected: {}", e),
        }
        if reply.send(result).is_err() {
            debug!("Requester went away before the reply");
        }
    }

    fn publish(&mut self) {
        let last_fired = std::iter::from_fn(|| self.fired_rx.try_recv().ok()).last();
        let timer = self.flow.clock().state();
        let pending = self.flow.pending();

        self.snapshot_tx.send_if_modified(|snapshot| {
            let last_fired = last_fired.or(snapshot.last_fired);
            if snapshot.timer == timer
                && snapshot.pending == pending
                && snapshot.last_fired == last_fired
            {
                return false;
            }
            *snapshot = ReminderSnapshot {
                timer,
                pending,
                last_fired,
            };
            true
        });
    }
}
