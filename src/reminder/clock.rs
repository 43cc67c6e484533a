//! Single countdown lifecycle
//!
//! ```text
//! Idle --start--> Running --elapsed--> Expired --start--> Running
//! Running --cancel--> Idle
//! Expired --cancel--> Idle
//! ```
//!
//! The countdown itself lives in the host: `start` registers a deferred
//! callback through [`Scheduler`], tagged with a generation id. When the host
//! delivers that callback it calls [`ReminderClock::fire`] with the tag, and
//! anything but the current generation is dropped. That makes `cancel`
//! final even if the host already queued the elapse.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{ReminderError, Result},
    state::{TimerState, TimerStatus},
};

use super::MAX_INTERVAL_MINUTES;

/// Tag carried by each scheduled countdown
pub type Generation = u64;

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Handle to a deferred callback registered with the host
pub trait TimerHandle {
    fn cancel(self);
}

/// Host service that calls back after a delay
///
/// The host must eventually pass `generation` to [`ReminderClock::fire`]
/// unless the returned handle is cancelled first.
pub trait Scheduler {
    type Handle: TimerHandle;

    fn schedule_after(&mut self, delay: StdDuration, generation: Generation) -> Self::Handle;
}

/// One fire occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderEvent {
    pub fired_at: DateTime<Utc>,
    pub interval_minutes: u32,
    /// Advisory; the real next fire time is fixed by the next `start`
    pub next_fire_at: DateTime<Utc>,
}

impl ReminderEvent {
    pub fn new(fired_at: DateTime<Utc>, interval_minutes: u32) -> Self {
        Self {
            fired_at,
            interval_minutes,
            next_fire_at: fired_at + Duration::minutes(i64::from(interval_minutes)),
        }
    }
}

pub type FireCallback = Box<dyn FnMut(&ReminderEvent) + Send>;

/// Owner of the one and only countdown
pub struct ReminderClock<C, S: Scheduler> {
    clock: C,
    scheduler: S,
    state: TimerState,
    generation: Generation,
    active: Option<S::Handle>,
    on_fire: Option<FireCallback>,
}

impl<C: Clock, S: Scheduler> ReminderClock<C, S> {
    /// Create an idle clock
    pub fn new(clock: C, scheduler: S) -> Self {
        Self {
            clock,
            scheduler,
            state: TimerState::new(),
            generation: 0,
            active: None,
            on_fire: None,
        }
    }

    /// Register the callback invoked once per natural elapse, replacing any
    /// previous one
    pub fn on_fire<F>(&mut self, callback: F)
    where
        F: FnMut(&ReminderEvent) + Send + 'static,
    {
        self.on_fire = Some(Box::new(callback));
    }

    /// Start a countdown of `minutes`, superseding any running one
    pub fn start(&mut self, minutes: i64) -> Result<()> {
        let interval = validate_interval(minutes)?;

        self.cancel_active();
        self.generation = self.generation.wrapping_add(1);

        let fire_at = self.clock.now() + Duration::minutes(i64::from(interval));
        let delay = StdDuration::from_secs(u64::from(interval) * 60);
        self.active = Some(self.scheduler.schedule_after(delay, self.generation));
        self.state.run(interval, fire_at);

        info!(
            "Reminder timer started: every {} minutes, next at {} (generation {})",
            interval, fire_at, self.generation
        );
        Ok(())
    }

    /// Stop the countdown and return to idle. No-op when already idle.
    pub fn cancel(&mut self) {
        match self.state.status {
            TimerStatus::Idle => debug!("Cancel requested while idle, nothing to do"),
            TimerStatus::Running => {
                self.cancel_active();
                self.state.idle();
                info!("Reminder timer cancelled (generation {})", self.generation);
            }
            TimerStatus::Expired => {
                self.state.idle();
                debug!("Expired reminder timer returned to idle");
            }
        }
    }

    /// Deliver an elapsed countdown from the host
    ///
    /// Returns the event (after invoking the registered callback) when
    /// `generation` is the running countdown, `None` for stale deliveries.
    pub fn fire(&mut self, generation: Generation) -> Option<ReminderEvent> {
        if generation != self.generation || !self.state.is_running() {
            debug!(
                "Ignoring stale countdown callback (generation {}, current {}, status {:?})",
                generation, self.generation, self.state.status
            );
            return None;
        }
        let interval = self.state.interval_minutes?;

        // The host has already run the callback; nothing left to cancel.
        self.active = None;
        self.state.expire();

        let event = ReminderEvent::new(self.clock.now(), interval);
        info!("Reminder fired after {} minutes", interval);

        if let Some(callback) = self.on_fire.as_mut() {
            callback(&event);
        }
        Some(event)
    }

    /// Interval of the current or most recently fired countdown
    pub fn remaining_interval(&self) -> Option<u32> {
        self.state.interval_minutes
    }

    /// Time left until the scheduled fire, while running
    pub fn remaining(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.state
            .scheduled_fire_at
            .map(|at| (at - now).max(Duration::zero()))
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn scheduled_fire_at(&self) -> Option<DateTime<Utc>> {
        self.state.scheduled_fire_at
    }

    /// Copy of the current timer state for display
    pub fn state(&self) -> TimerState {
        self.state.clone()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn cancel_active(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }
    }
}

fn validate_interval(minutes: i64) -> Result<u32> {
    if !(1..=MAX_INTERVAL_MINUTES).contains(&minutes) {
        return Err(ReminderError::InvalidInterval { minutes });
    }
    u32::try_from(minutes).map_err(|_| ReminderError::InvalidInterval { minutes })
}
