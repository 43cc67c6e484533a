//! State management module
//!
//! This module contains the timer state owned by the reminder core and the
//! application state shared with the HTTP handlers.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::{TimerState, TimerStatus};
