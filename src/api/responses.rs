//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    reminder::{NextAction, Notice, PendingResolution, ReminderEvent, ResolutionChoice},
    state::{TimerState, TimerStatus},
};

/// Body of POST /start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRequest {
    pub minutes: i64,
}

/// Body of POST /resolve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub choice: ResolutionChoice,
}

/// API response structure for control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<NextAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    pub timer: TimerState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            action: None,
            notice: None,
            timer,
        }
    }

    /// Create a response for a completed action, status taken from the timer
    pub fn action(action: NextAction, notice: Option<Notice>, timer: TimerState) -> Self {
        let status = match timer.status {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Expired => "expired",
        };
        let message = notice
            .as_ref()
            .map_or_else(|| "Timer is not running".to_string(), |n| n.message.clone());
        let mut response = Self::new(status.to_string(), message, timer);
        response.action = Some(action);
        response.notice = notice;
        response
    }

    /// Create an error response
    pub fn error(message: String, timer: TimerState) -> Self {
        Self::new("error".to_string(), message, timer)
    }
}

/// Status response with timer information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    pub timer_remaining_seconds: Option<u64>,
    pub awaiting_resolution: bool,
    pub pending: Option<PendingResolution>,
    pub last_fired: Option<ReminderEvent>,
    pub presets: Vec<u32>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
