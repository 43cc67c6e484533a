//! Deterministic host services for unit tests

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration as StdDuration,
};

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{Clock, Generation, ReminderClock, Scheduler, TimerHandle};

/// Clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Arc::new(Mutex::new(
                Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap(),
            )),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Debug)]
struct Scheduled {
    delay: StdDuration,
    generation: Generation,
    cancelled: Arc<AtomicBool>,
}

/// Scheduler that records registrations; tests deliver elapses by hand
#[derive(Debug, Clone, Default)]
pub struct RecordingScheduler {
    scheduled: Arc<Mutex<Vec<Scheduled>>>,
}

pub struct RecordedHandle(Arc<AtomicBool>);

impl TimerHandle for RecordedHandle {
    fn cancel(self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl Scheduler for RecordingScheduler {
    type Handle = RecordedHandle;

    fn schedule_after(&mut self, delay: StdDuration, generation: Generation) -> RecordedHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.scheduled.lock().unwrap().push(Scheduled {
            delay,
            generation,
            cancelled: Arc::clone(&cancelled),
        });
        RecordedHandle(cancelled)
    }
}

impl RecordingScheduler {
    pub fn delays(&self) -> Vec<StdDuration> {
        self.scheduled.lock().unwrap().iter().map(|s| s.delay).collect()
    }

    pub fn last_generation(&self) -> Option<Generation> {
        self.scheduled.lock().unwrap().last().map(|s| s.generation)
    }

    pub fn is_cancelled(&self, generation: Generation) -> bool {
        self.scheduled
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.generation == generation && s.cancelled.load(Ordering::SeqCst))
    }

    /// Registrations that were never cancelled
    pub fn live_count(&self) -> usize {
        self.scheduled
            .lock()
            .unwrap()
            .iter()
            .filter(|s| !s.cancelled.load(Ordering::SeqCst))
            .count()
    }
}

pub fn fixture() -> (
    ManualClock,
    RecordingScheduler,
    ReminderClock<ManualClock, RecordingScheduler>,
) {
    let clock = ManualClock::default();
    let scheduler = RecordingScheduler::default();
    let timer = ReminderClock::new(clock.clone(), scheduler.clone());
    (clock, scheduler, timer)
}
