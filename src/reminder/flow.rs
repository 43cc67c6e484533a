//! Resolution flow for fired reminders
//!
//! ```text
//! Idle --fired--> AwaitingResolution --resolve(Continue)--> Idle (timer running)
//! AwaitingResolution --resolve(Stop)--> Idle (no timer)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::{ReminderError, Result},
    state::TimerStatus,
};

use super::{Clock, Generation, ReminderClock, ReminderEvent, Scheduler};

pub const REMINDER_TITLE: &str = "Reminder";
pub const REMINDER_TEXT: &str = "Time to get up and stretch!";

/// The user's answer to a fired reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionChoice {
    #[serde(alias = "ok")]
    Continue,
    #[serde(alias = "abort")]
    Stop,
}

/// What the presentation layer shows for a fired reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingResolution {
    pub title: String,
    pub message: String,
    pub choices: Vec<ResolutionChoice>,
    /// Play the audible alert now
    pub alert: bool,
    pub event: ReminderEvent,
}

impl PendingResolution {
    fn for_event(event: ReminderEvent) -> Self {
        Self {
            title: REMINDER_TITLE.to_string(),
            message: REMINDER_TEXT.to_string(),
            choices: vec![ResolutionChoice::Continue, ResolutionChoice::Stop],
            alert: true,
            event,
        }
    }
}

/// What the presentation layer does after a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NextAction {
    /// Tell the user when the next reminder comes
    ScheduleNotice { next_fire_at: DateTime<Utc> },
    /// Restore the idle window
    ReturnToIdle,
}

/// Drives a [`ReminderClock`] through fire and resolution
pub struct ReminderFlow<C, S: Scheduler> {
    clock: ReminderClock<C, S>,
    pending: Option<ReminderEvent>,
}

impl<C: Clock, S: Scheduler> ReminderFlow<C, S> {
    pub fn new(clock: ReminderClock<C, S>) -> Self {
        Self {
            clock,
            pending: None,
        }
    }

    pub fn clock(&self) -> &ReminderClock<C, S> {
        &self.clock
    }

    /// Register the clock's fire callback
    pub fn on_fire<F>(&mut self, callback: F)
    where
        F: FnMut(&ReminderEvent) + Send + 'static,
    {
        self.clock.on_fire(callback);
    }

    /// Deliver an elapsed countdown from the host to the clock
    pub fn fire(&mut self, generation: Generation) -> Option<ReminderEvent> {
        self.clock.fire(generation)
    }

    pub fn is_awaiting_resolution(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a timer is running or a reminder is still on screen
    pub fn is_active(&self) -> bool {
        self.pending.is_some() || self.clock.status() != TimerStatus::Idle
    }

    /// The reminder currently awaiting an answer
    pub fn pending(&self) -> Option<PendingResolution> {
        self.pending.map(PendingResolution::for_event)
    }

    /// Start a new cycle from the main window's interval buttons
    pub fn start(&mut self, minutes: i64) -> Result<NextAction> {
        if self.pending.is_some() {
            warn!("Start of {} minutes rejected: a reminder awaits resolution", minutes);
            return Err(ReminderError::ResolutionPending);
        }
        self.clock.start(minutes)?;
        Ok(self.schedule_notice())
    }

    /// The main window's stop button: cancel and drop any pending reminder
    pub fn stop(&mut self) -> NextAction {
        if self.pending.take().is_some() {
            info!("Pending reminder dismissed by stop");
        }
        self.clock.cancel();
        NextAction::ReturnToIdle
    }

    /// Accept a fire event and await the user's answer
    pub fn on_reminder_fired(&mut self, event: ReminderEvent) -> PendingResolution {
        if let Some(previous) = self.pending.replace(event) {
            warn!(
                "Reminder fired at {} replaced an unresolved one from {}",
                event.fired_at, previous.fired_at
            );
        }
        info!("Reminder awaiting resolution");
        PendingResolution::for_event(event)
    }

    /// Apply the user's answer to the pending reminder
    pub fn resolve(&mut self, choice: ResolutionChoice) -> Result<NextAction> {
        let Some(event) = self.pending.take() else {
            warn!("Resolve ({:?}) called with no pending reminder", choice);
            return Err(ReminderError::NoPendingResolution);
        };

        match choice {
            ResolutionChoice::Continue => {
                if let Err(e) = self.clock.start(i64::from(event.interval_minutes)) {
                    self.pending = Some(event);
                    return Err(e);
                }
                info!("Reminder acknowledged, continuing every {} minutes", event.interval_minutes);
                Ok(self.schedule_notice())
            }
            ResolutionChoice::Stop => {
                self.clock.cancel();
                info!("Reminder stopped by user");
                Ok(NextAction::ReturnToIdle)
            }
        }
    }

    fn schedule_notice(&self) -> NextAction {
        match self.clock.scheduled_fire_at() {
            Some(next_fire_at) => NextAction::ScheduleNotice { next_fire_at },
            None => NextAction::ReturnToIdle,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::reminder::testing::{fixture, ManualClock, RecordingScheduler};

    type TestFlow = ReminderFlow<ManualClock, RecordingScheduler>;

    fn flow() -> (ManualClock, RecordingScheduler, TestFlow) {
        let (clock, scheduler, timer) = fixture();
        (clock, scheduler, ReminderFlow::new(timer))
    }

    /// Start, let the full interval elapse and deliver the fire
    fn elapse(clock: &ManualClock, scheduler: &RecordingScheduler, flow: &mut TestFlow) -> ReminderEvent {
        let minutes = flow.clock().remaining_interval().unwrap();
        clock.advance(Duration::minutes(i64::from(minutes)));
        flow.fire(scheduler.last_generation().unwrap()).unwrap()
    }

    #[test]
    fn fired_reminder_offers_two_choices() {
        let (clock, scheduler, mut flow) = flow();
        flow.start(15).unwrap();
        let event = elapse(&clock, &scheduler, &mut flow);
        assert_eq!(event.interval_minutes, 15);

        let pending = flow.on_reminder_fired(event);
        assert_eq!(pending.message, REMINDER_TEXT);
        assert_eq!(
            pending.choices,
            vec![ResolutionChoice::Continue, ResolutionChoice::Stop]
        );
        assert!(pending.alert);
        assert!(flow.is_awaiting_resolution());
        assert_eq!(flow.pending(), Some(pending));
    }

    #[test]
    fn continue_reschedules_same_interval() {
        let (clock, scheduler, mut flow) = flow();
        flow.start(15).unwrap();
        let event = elapse(&clock, &scheduler, &mut flow);
        flow.on_reminder_fired(event);

        let action = flow.resolve(ResolutionChoice::Continue).unwrap();
        assert_eq!(
            action,
            NextAction::ScheduleNotice {
                next_fire_at: event.fired_at + Duration::minutes(15)
            }
        );
        assert_eq!(flow.clock().status(), TimerStatus::Running);
        assert_eq!(flow.clock().remaining_interval(), Some(15));
        assert!(!flow.is_awaiting_resolution());
        assert_eq!(scheduler.delays().len(), 2);
    }

    #[test]
    fn stop_returns_to_idle_and_second_resolve_fails() {
        let (clock, scheduler, mut flow) = flow();
        flow.start(30).unwrap();
        let event = elapse(&clock, &scheduler, &mut flow);
        flow.on_reminder_fired(event);

        assert_eq!(
            flow.resolve(ResolutionChoice::Stop),
            Ok(NextAction::ReturnToIdle)
        );
        assert_eq!(flow.clock().status(), TimerStatus::Idle);
        assert_eq!(
            flow.resolve(ResolutionChoice::Stop),
            Err(ReminderError::NoPendingResolution)
        );
        assert_eq!(
            flow.resolve(ResolutionChoice::Continue),
            Err(ReminderError::NoPendingResolution)
        );
        assert_eq!(flow.clock().status(), TimerStatus::Idle);
    }

    #[test]
    fn resolve_without_fire_leaves_timer_alone() {
        let (_clock, _scheduler, mut flow) = flow();
        flow.start(60).unwrap();
        let before = flow.clock().state();
        assert_eq!(
            flow.resolve(ResolutionChoice::Continue),
            Err(ReminderError::NoPendingResolution)
        );
        assert_eq!(flow.clock().state(), before);
    }

    #[test]
    fn start_is_gated_behind_resolution() {
        let (clock, scheduler, mut flow) = flow();
        flow.start(15).unwrap();
        let event = elapse(&clock, &scheduler, &mut flow);
        flow.on_reminder_fired(event);

        assert_eq!(flow.start(30), Err(ReminderError::ResolutionPending));
        assert_eq!(flow.clock().status(), TimerStatus::Expired);

        flow.resolve(ResolutionChoice::Continue).unwrap();
        let action = flow.start(30).unwrap();
        assert_eq!(flow.clock().remaining_interval(), Some(30));
        assert_eq!(
            action,
            NextAction::ScheduleNotice {
                next_fire_at: clock.now() + Duration::minutes(30)
            }
        );
    }

    #[test]
    fn stop_dismisses_pending_reminder() {
        let (clock, scheduler, mut flow) = flow();
        flow.start(15).unwrap();
        let event = elapse(&clock, &scheduler, &mut flow);
        flow.on_reminder_fired(event);

        assert_eq!(flow.stop(), NextAction::ReturnToIdle);
        assert!(!flow.is_awaiting_resolution());
        assert_eq!(flow.clock().status(), TimerStatus::Idle);
        assert_eq!(flow.stop(), NextAction::ReturnToIdle);
    }

    #[test]
    fn active_until_stopped() {
        let (clock, scheduler, mut flow) = flow();
        assert!(!flow.is_active());

        flow.start(15).unwrap();
        assert!(flow.is_active());
        let event = elapse(&clock, &scheduler, &mut flow);
        flow.on_reminder_fired(event);
        assert!(flow.is_active());

        flow.stop();
        assert!(!flow.is_active());
    }

    #[test]
    fn invalid_start_keeps_state() {
        let (_clock, _scheduler, mut flow) = flow();
        assert_eq!(
            flow.start(0),
            Err(ReminderError::InvalidInterval { minutes: 0 })
        );
        assert_eq!(flow.clock().status(), TimerStatus::Idle);
    }

    #[test]
    fn choice_wire_names() {
        let choice: ResolutionChoice = serde_json::from_str("\"continue\"").unwrap();
        assert_eq!(choice, ResolutionChoice::Continue);
        let choice: ResolutionChoice = serde_json::from_str("\"abort\"").unwrap();
        assert_eq!(choice, ResolutionChoice::Stop);
        assert!(serde_json::from_str::<ResolutionChoice>("\"snooze\"").is_err());
    }
}
