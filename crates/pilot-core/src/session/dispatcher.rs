//! Dispatcher for backend submissions
//!
//! Each submission runs as its own tokio task. Results come back as
//! [`BackendEvent`]s on a channel the frontend's event loop drains, so session
//! state visible to the UI is only ever changed from that loop.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::Error;
use super::backend::{Backend, BackendReply};
use super::types::SessionId;

/// Type alias for the event receiver
pub type EventReceiver = mpsc::UnboundedReceiver<BackendEvent>;

/// Completion of a backend submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// The backend answered
    Completed {
        session_id: SessionId,
        reply: BackendReply,
    },
    /// The backend call failed
    Failed {
        session_id: SessionId,
        message: String,
    },
}

impl BackendEvent {
    pub fn session_id(&self) -> &str {
        match self {
            Self::Completed { session_id, .. } | Self::Failed { session_id, .. } => session_id,
        }
    }
}

type InFlight = Arc<Mutex<HashMap<u64, (SessionId, CancellationToken)>>>;

/// Spawns backend calls and tracks them until they finish or are cancelled
pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    in_flight: InFlight,
    next_task: AtomicU64,
}

impl Dispatcher {
    /// Create a dispatcher for `backend`
    ///
    /// Returns the dispatcher and the receiver completions are delivered on.
    pub fn new(backend: Arc<dyn Backend>) -> (Self, EventReceiver) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            backend,
            event_tx,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            next_task: AtomicU64::new(0),
        };
        (dispatcher, event_rx)
    }

    /// Submit `input` for `session_id` without waiting for the result.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, session_id: SessionId, input: String) {
        let task_id = self.next_task.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        self.in_flight
            .lock()
            .insert(task_id, (session_id.clone(), token.clone()));

        let backend = Arc::clone(&self.backend);
        let event_tx = self.event_tx.clone();
        let in_flight = Arc::clone(&self.in_flight);

        info!("Submitting input to backend for session {}", session_id);
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => Err(Error::Cancelled),
                result = backend.submit(&session_id, &input) => result,
            };
            in_flight.lock().remove(&task_id);

            let event = match result {
                Ok(reply) => BackendEvent::Completed { session_id, reply },
                Err(Error::Cancelled) => {
                    debug!("Submission for session {} cancelled", session_id);
                    return;
                }
                Err(e) => {
                    warn!("Backend failed for session {}: {}", session_id, e);
                    BackendEvent::Failed {
                        session_id,
                        message: e.to_string(),
                    }
                }
            };

            if event_tx.send(event).is_err() {
                debug!("Event receiver dropped, discarding backend result");
            }
        });
    }

    /// Cancel every in-flight submission for a session.
    ///
    /// Returns how many were cancelled.
    pub fn cancel(&self, session_id: &str) -> usize {
        let mut in_flight = self.in_flight.lock();
        let before = in_flight.len();
        in_flight.retain(|_, (sid, token)| {
            if sid == session_id {
                token.cancel();
                false
            } else {
                true
            }
        });
        let cancelled = before - in_flight.len();
        if cancelled > 0 {
            info!("Cancelled {} submission(s) for session {}", cancelled, session_id);
        }
        cancelled
    }

    /// Cancel all in-flight submissions
    pub fn cancel_all(&self) {
        let mut in_flight = self.in_flight.lock();
        for (_, (_, token)) in in_flight.drain() {
            token.cancel();
        }
    }

    /// Whether a session has a submission in flight
    pub fn in_flight(&self, session_id: &str) -> bool {
        self.in_flight
            .lock()
            .values()
            .any(|(sid, _)| sid == session_id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        debug!("Dispatcher dropping, cancelling in-flight submissions");
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::backend::SimulatedBackend;
    use std::time::Duration;

    #[tokio::test]
    async fn test_submit_delivers_completion() {
        let (dispatcher, mut events) = Dispatcher::new(Arc::new(SimulatedBackend::default()));
        dispatcher.submit("s1".to_string(), "hello".to_string());

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            BackendEvent::Completed {
                session_id: "s1".to_string(),
                reply: BackendReply::lines(["Claude response to: hello"]),
            }
        );
        assert_eq!(dispatcher.in_flight_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_delivery() {
        let backend = SimulatedBackend::new(Duration::from_secs(10));
        let (dispatcher, mut events) = Dispatcher::new(Arc::new(backend));
        dispatcher.submit("s1".to_string(), "slow".to_string());
        assert!(dispatcher.in_flight("s1"));

        assert_eq!(dispatcher.cancel("s1"), 1);
        assert!(!dispatcher.in_flight("s1"));

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancel_unknown_session() {
        let (dispatcher, _events) = Dispatcher::new(Arc::new(SimulatedBackend::default()));
        assert_eq!(dispatcher.cancel("nonexistent"), 0);
    }
}
