//! Desktop side effects: notices and the audible reminder alert

use std::{
    path::Path,
    process::{Command, Stdio},
};

use notify_rust::{Notification, Urgency};
use tracing::{debug, info, warn};

use crate::reminder::{Notice, PendingResolution};

const APP_NAME: &str = "stretch-reminder";

/// Players and sound files tried in order for the reminder alert
const ALERT_SOUNDS: [(&str, &str); 3] = [
    ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
    ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
    ("aplay", "/usr/share/sounds/generic.wav"),
];

/// Presentation-side sink for what the reminder loop wants the user to see
pub trait Notifier: Send + Sync + 'static {
    /// Show an informational notice
    fn notify(&self, notice: &Notice);

    /// Surface a fired reminder, sounding the alert if requested
    fn alert(&self, pending: &PendingResolution);
}

/// Shows desktop notifications and plays the alert sound for reminders
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    sound: bool,
}

impl DesktopNotifier {
    pub fn new(sound: bool) -> Self {
        Self { sound }
    }

    fn show(&self, notification: &Notification) {
        if let Err(e) = notification.show() {
            warn!("Failed to show desktop notification: {}", e);
        }
    }

    fn play_sound(&self) {
        std::thread::spawn(|| {
            let Some((player, file)) = ALERT_SOUNDS
                .into_iter()
                .find(|(_, file)| Path::new(file).exists())
            else {
                debug!("No alert sound file found");
                return;
            };
            if let Err(e) = Command::new(player)
                .arg(file)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                warn!("Failed to play alert sound with {}: {}", player, e);
            }
        });
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, notice: &Notice) {
        info!("[{}] {}", notice.title, notice.message);
        self.show(&notice_notification(notice));
    }

    fn alert(&self, pending: &PendingResolution) {
        info!(
            "[{}] {} (every {} minutes; answer with continue or stop)",
            pending.title, pending.message, pending.event.interval_minutes
        );
        self.show(&alert_notification(pending));
        if pending.alert && self.sound {
            self.play_sound();
        }
    }
}

fn notice_notification(notice: &Notice) -> Notification {
    let mut notification = Notification::new();
    notification
        .summary(&notice.title)
        .body(&notice.message)
        .appname(APP_NAME);
    notification
}

fn alert_notification(pending: &PendingResolution) -> Notification {
    let mut notification = Notification::new();
    notification
        .summary(&pending.title)
        .body(&pending.message)
        .appname(APP_NAME)
        .icon("alarm-clock")
        .urgency(Urgency::Critical);
    notification
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::reminder::{ReminderEvent, ResolutionChoice};

    #[test]
    fn notice_becomes_desktop_notification() {
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 9, 15, 0).unwrap();
        let notice = Notice::next_reminder(at);

        let notification = notice_notification(&notice);
        assert_eq!(notification.summary, notice.title);
        assert_eq!(notification.body, notice.message);
        assert_eq!(notification.appname, APP_NAME);
    }

    #[test]
    fn reminder_becomes_desktop_notification() {
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 9, 15, 0).unwrap();
        let pending = PendingResolution {
            title: "Reminder".to_string(),
            message: "Time to get up and stretch!".to_string(),
            choices: vec![ResolutionChoice::Continue, ResolutionChoice::Stop],
            alert: true,
            event: ReminderEvent::new(at, 15),
        };

        let notification = alert_notification(&pending);
        assert_eq!(notification.summary, "Reminder");
        assert_eq!(notification.body, "Time to get up and stretch!");
        assert_eq!(notification.icon, "alarm-clock");
    }
}
