//! Reminder core
//!
//! [`ReminderClock`] owns the single countdown; [`ReminderFlow`] turns its
//! fire events into a pending resolution and applies the user's answer.
//! Both are synchronous and never block: time and deferred callbacks come
//! from the host through the [`Clock`] and [`Scheduler`] traits.

pub mod clock;
pub mod flow;
pub mod notice;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::{Clock, FireCallback, Generation, ReminderClock, ReminderEvent, Scheduler, TimerHandle};
pub use flow::{NextAction, PendingResolution, ReminderFlow, ResolutionChoice};
pub use notice::Notice;

/// Intervals offered as one-click buttons
pub const PRESET_MINUTES: [u32; 3] = [15, 30, 60];

/// Longest accepted interval: one week
pub const MAX_INTERVAL_MINUTES: i64 = 7 * 24 * 60;
