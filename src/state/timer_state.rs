//! Timer state structure and management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle phase of the single countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Expired,
}

/// Timer state for tracking the reminder countdown
///
/// `scheduled_fire_at` is present iff `status` is `Running`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub status: TimerStatus,
    /// Interval of the current or most recently fired countdown
    pub interval_minutes: Option<u32>,
    pub scheduled_fire_at: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Create a new idle timer state
    pub fn new() -> Self {
        Self {
            status: TimerStatus::Idle,
            interval_minutes: None,
            scheduled_fire_at: None,
        }
    }

    /// Move to `Running` with the given interval and fire time
    pub(crate) fn run(&mut self, interval_minutes: u32, fire_at: DateTime<Utc>) {
        self.status = TimerStatus::Running;
        self.interval_minutes = Some(interval_minutes);
        self.scheduled_fire_at = Some(fire_at);
    }

    /// Move to `Expired`, keeping the interval for rescheduling
    pub(crate) fn expire(&mut self) {
        self.status = TimerStatus::Expired;
        self.scheduled_fire_at = None;
    }

    /// Move to `Idle`, keeping the interval for display
    pub(crate) fn idle(&mut self) {
        self.status = TimerStatus::Idle;
        self.scheduled_fire_at = None;
    }

    /// Check if the countdown is running
    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Seconds left until the scheduled fire time, if running
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<u64> {
        self.scheduled_fire_at
            .map(|at| (at - now).num_seconds().max(0) as u64)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
