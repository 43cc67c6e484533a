//! Host services module
//!
//! This module contains the tokio-backed clock and scheduler the reminder
//! core runs on, and the notifier that surfaces reminders to the user.

pub mod host;
pub mod notifier;

// Re-export main types
pub use host::{SystemClock, TokioScheduler, TokioTimerHandle};
pub use notifier::{DesktopNotifier, Notifier};
