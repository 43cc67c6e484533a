//! User-facing notice text

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

pub const NOTICE_TITLE: &str = "Stretch Reminder";

/// An informational desktop notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(title: &str, message: String) -> Self {
        Self {
            title: title.to_string(),
            message,
        }
    }

    /// Shown when the user starts a new reminder cycle
    pub fn started(interval_minutes: u32, next_fire_at: DateTime<Utc>) -> Self {
        Self::new(
            NOTICE_TITLE,
            format!(
                "Timer is set for every {} minutes. Your next notification will be at {}.",
                interval_minutes,
                clock_time(next_fire_at)
            ),
        )
    }

    /// Shown after the user acknowledges a reminder
    pub fn next_reminder(next_fire_at: DateTime<Utc>) -> Self {
        Self::new(
            NOTICE_TITLE,
            format!("Your next reminder will be at {}.", clock_time(next_fire_at)),
        )
    }

    pub fn stopped() -> Self {
        Self::new("Stopped", "Timer has stopped".to_string())
    }
}

/// Local 12-hour wall-clock time, e.g. "09:15 AM"
pub fn clock_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn notice_texts() {
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 9, 15, 0).unwrap();
        let time = clock_time(at);
        assert!(time.ends_with("AM") || time.ends_with("PM"));
        assert_eq!(time.len(), "09:15 AM".len());

        let started = Notice::started(15, at);
        assert_eq!(started.title, NOTICE_TITLE);
        assert_eq!(
            started.message,
            format!("Timer is set for every 15 minutes. Your next notification will be at {time}.")
        );
        assert_eq!(
            Notice::next_reminder(at).message,
            format!("Your next reminder will be at {time}.")
        );
        assert_eq!(Notice::stopped().message, "Timer has stopped");
    }
}
