//! Background tasks module
//!
//! This module contains the reminder loop that runs alongside the HTTP server.

pub mod reminder_loop;

// Re-export main types
pub use reminder_loop::{
    reminder_loop_task, spawn_reminder_loop, Command, ControlError, Outcome, ReminderHandle,
    ReminderSnapshot,
};
