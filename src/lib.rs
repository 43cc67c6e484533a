//! Stretch Reminder - a single-timer reminder with a local HTTP control surface
//!
//! The core is a small state machine: [`reminder::ReminderClock`] owns one
//! countdown and [`reminder::ReminderFlow`] resolves each fired reminder with
//! either "continue" (same interval again) or "stop". Everything else wires
//! that core to tokio, a notifier and an HTTP API.

pub mod api;
pub mod config;
pub mod error;
pub mod reminder;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::ReminderError;
pub use reminder::{ReminderClock, ReminderFlow};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
