//! A single conversation: identity, status, and transcript
//!
//! All mutable fields sit behind one reader/writer lock, so readers always
//! observe a fully-formed state.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::types::{
    PROCESSING_NOTICE, SessionId, SessionSnapshot, SessionStatus, new_session_id,
    simulated_response,
};

#[derive(Debug)]
struct SessionState {
    name: String,
    status: SessionStatus,
    output: Vec<String>,
    last_message: Option<String>,
    updated_at: DateTime<Utc>,
}

impl SessionState {
    fn push(&mut self, line: String) {
        self.last_message = Some(line.clone());
        self.output.push(line);
        self.updated_at = Utc::now();
    }
}

/// One independent conversation thread
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    created_at: DateTime<Utc>,
    state: RwLock<SessionState>,
}

impl Session {
    /// Create an idle session with an empty transcript
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_session_id(),
            created_at: now,
            state: RwLock::new(SessionState {
                name: name.into(),
                status: SessionStatus::Idle,
                output: Vec::new(),
                last_message: None,
                updated_at: now,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn name(&self) -> String {
        self.state.read().name.clone()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.state.read().updated_at
    }

    pub fn last_message(&self) -> Option<String> {
        self.state.read().last_message.clone()
    }

    /// Append a line to the transcript
    pub fn append_output(&self, line: impl Into<String>) {
        self.state.write().push(line.into());
    }

    /// Copy of the transcript
    pub fn output(&self) -> Vec<String> {
        self.state.read().output.clone()
    }

    /// Number of transcript lines, without copying them
    pub fn output_len(&self) -> usize {
        self.state.read().output.len()
    }

    pub fn set_status(&self, status: SessionStatus) {
        let mut state = self.state.write();
        state.status = status;
        state.updated_at = Utc::now();
    }

    pub fn status(&self) -> SessionStatus {
        self.state.read().status
    }

    /// Consistent copy of every field
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read();
        SessionSnapshot {
            id: self.id.clone(),
            name: state.name.clone(),
            status: state.status,
            output: state.output.clone(),
            last_message: state.last_message.clone(),
            created_at: self.created_at,
            updated_at: state.updated_at,
        }
    }

    /// Process an input synchronously with the simulated backend.
    ///
    /// Appends the processing notice followed by the canned response as one
    /// atomic update. Frontends that must not block go through
    /// [`Dispatcher`](super::Dispatcher) instead.
    pub fn submit(&self, input: &str) {
        let mut state = self.state.write();
        state.push(PROCESSING_NOTICE.to_string());
        state.push(simulated_response(input));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new("Main Session");
        assert_eq!(session.name(), "Main Session");
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.output().is_empty());
        assert!(session.last_message().is_none());
        assert_eq!(session.created_at(), session.updated_at());
    }

    #[test]
    fn test_append_output_tracks_last_message() {
        let session = Session::new("s");
        session.append_output("one");
        session.append_output("two");
        assert_eq!(session.output(), vec!["one", "two"]);
        assert_eq!(session.last_message().as_deref(), Some("two"));
        assert_eq!(session.output_len(), 2);
        assert!(session.updated_at() >= session.created_at());
    }

    #[test]
    fn test_output_is_a_copy() {
        let session = Session::new("s");
        session.append_output("one");
        let copy = session.output();
        session.append_output("two");
        assert_eq!(copy, vec!["one"]);
    }

    #[test]
    fn test_any_status_transition_is_allowed() {
        let session = Session::new("s");
        session.set_status(SessionStatus::Error);
        session.set_status(SessionStatus::Running);
        assert_eq!(session.status(), SessionStatus::Running);
        session.set_status(SessionStatus::Connecting);
        session.set_status(SessionStatus::Idle);
        assert_eq!(session.status(), SessionStatus::Idle);
    }

    #[test]
    fn test_submit_appends_notice_and_response() {
        let session = Session::new("Main Session");
        session.submit("hello");
        assert_eq!(
            session.output(),
            vec![PROCESSING_NOTICE.to_string(), "Claude response to: hello".to_string()]
        );
        assert_eq!(
            session.last_message().as_deref(),
            Some("Claude response to: hello")
        );
    }

    #[test]
    fn test_snapshot_is_consistent() {
        let session = Session::new("snap");
        session.append_output("line");
        session.set_status(SessionStatus::Running);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.id, session.id());
        assert_eq!(snapshot.name, "snap");
        assert_eq!(snapshot.status, SessionStatus::Running);
        assert_eq!(snapshot.output, vec!["line"]);
        assert_eq!(snapshot.last_message.as_deref(), Some("line"));
    }
}
