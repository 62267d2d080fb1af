//! Session types shared by the store, the backend seam, and frontends

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a session
pub type SessionId = String;

/// Notice appended to a transcript while a submission is being processed
pub const PROCESSING_NOTICE: &str = "🤖 Processing your request...";

/// Generate a fresh session identifier.
///
/// Random v4 UUIDs, so sessions created within the same clock tick never collide.
pub fn new_session_id() -> SessionId {
    uuid::Uuid::new_v4().to_string()
}

/// Canned reply of the simulated backend for a submitted input
pub fn simulated_response(input: &str) -> String {
    format!("Claude response to: {}", input.trim().replace('\n', " "))
}

/// Lifecycle status of a session.
///
/// Transitions are not validated: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Connecting,
    Error,
    Stopped,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Connecting => "connecting",
            Self::Error => "error",
            Self::Stopped => "stopped",
        }
    }

    /// Single-glyph indicator used in session lists
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Idle => "○",
            Self::Running => "●",
            Self::Connecting => "◐",
            Self::Error => "✗",
            Self::Stopped => "■",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time copy of a session, taken under a single read lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub name: String,
    pub status: SessionStatus,
    pub output: Vec<String>,
    pub last_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(SessionStatus::Idle.to_string(), "idle");
        assert_eq!(SessionStatus::Running.to_string(), "running");
        assert_eq!(SessionStatus::Connecting.to_string(), "connecting");
        assert_eq!(SessionStatus::Error.to_string(), "error");
        assert_eq!(SessionStatus::Stopped.to_string(), "stopped");
        assert_eq!(SessionStatus::default(), SessionStatus::Idle);
    }

    #[test]
    fn test_simulated_response_flattens_lines() {
        assert_eq!(simulated_response("hello"), "Claude response to: hello");
        assert_eq!(
            simulated_response("  first\nsecond\n"),
            "Claude response to: first second"
        );
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: std::collections::HashSet<_> = (0..1000).map(|_| new_session_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
