//! Backend seam
//!
//! A backend turns a submitted input into transcript lines. Calls are
//! asynchronous and are driven by the [`Dispatcher`](super::Dispatcher), never
//! by the UI thread directly.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use super::types::{SessionId, SessionStatus, simulated_response};

/// Result of a completed backend call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendReply {
    /// Lines to append to the session transcript, in order
    pub lines: Vec<String>,
    /// New session status, if the backend reports one
    pub status: Option<SessionStatus>,
}

impl BackendReply {
    pub fn lines(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Something that can answer a session's input
#[async_trait]
pub trait Backend: Send + Sync {
    /// Process `input` for `session_id`
    async fn submit(&self, session_id: &SessionId, input: &str) -> Result<BackendReply>;
}

/// Backend that echoes the input back after a fixed delay
#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend {
    latency: Duration,
}

impl SimulatedBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Backend for SimulatedBackend {
    async fn submit(&self, session_id: &SessionId, input: &str) -> Result<BackendReply> {
        debug!("Simulated backend handling input for session {}", session_id);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(BackendReply::lines([simulated_response(input)]))
    }
}
