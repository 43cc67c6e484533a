//! Error types for the reminder core

use thiserror::Error;

/// Caller-contract violations reported by the reminder core.
///
/// None of these leave the timer in a changed state: every transition is
/// committed only after its precondition check passes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReminderError {
    /// `start` was called with a zero, negative or out-of-range interval
    #[error("invalid reminder interval: {minutes} minutes (must be between 1 and {max})", max = crate::reminder::MAX_INTERVAL_MINUTES)]
    InvalidInterval { minutes: i64 },

    /// `resolve` was called with no reminder awaiting an answer
    #[error("no reminder is awaiting resolution")]
    NoPendingResolution,

    /// A new timer was requested while a fired reminder is still unanswered
    #[error("a reminder is awaiting resolution; continue or stop it first")]
    ResolutionPending,
}

pub type Result<T> = std::result::Result<T, ReminderError>;
