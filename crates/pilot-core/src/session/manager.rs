//! Session Manager - the ordered, thread-safe session store
//!
//! Insertion order is preserved; it is both the display order of the session
//! list and the index space of the list cursor.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::state::Session;

/// Ordered collection of sessions shared between the UI and backend tasks
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: RwLock<Vec<Arc<Session>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session and append it to the end of the list
    pub fn create(&self, name: impl Into<String>) -> Arc<Session> {
        let session = Arc::new(Session::new(name));
        self.sessions.write().push(Arc::clone(&session));
        info!("Created session {} ({})", session.name(), session.id());
        session
    }

    /// Copy of the current session list.
    ///
    /// The returned vector is unaffected by later creates or removes.
    pub fn list(&self) -> Vec<Arc<Session>> {
        self.sessions.read().clone()
    }

    /// Look up a session by id
    pub fn get(&self, session_id: &str) -> Option<Arc<Session>> {
        let found = self
            .sessions
            .read()
            .iter()
            .find(|s| s.id() == session_id)
            .cloned();
        if found.is_none() {
            debug!("Session not found: {}", session_id);
        }
        found
    }

    /// Index of a session in list order
    pub fn position(&self, session_id: &str) -> Option<usize> {
        self.sessions.read().iter().position(|s| s.id() == session_id)
    }

    /// Remove a session, keeping the order of the others.
    ///
    /// Returns whether a session was removed.
    pub fn remove(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write();
        match sessions.iter().position(|s| s.id() == session_id) {
            Some(index) => {
                let removed = sessions.remove(index);
                info!("Removed session {} ({})", removed.name(), session_id);
                true
            }
            None => {
                debug!("Remove ignored, session not found: {}", session_id);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_manager_creation() {
        let manager = SessionManager::new();
        assert_eq!(manager.len(), 0);
        assert!(manager.is_empty());
        assert!(manager.list().is_empty());
    }

    #[test]
    fn test_create_preserves_order() {
        let manager = SessionManager::new();
        let a = manager.create("a");
        let b = manager.create("b");
        let c = manager.create("c");

        let ids: Vec<_> = manager.list().iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids, vec![a.id(), b.id(), c.id()]);
        assert_eq!(manager.position(c.id()), Some(2));
    }

    #[test]
    fn test_get_missing_session() {
        let manager = SessionManager::new();
        manager.create("a");
        assert!(manager.get("nonexistent").is_none());
    }

    #[test]
    fn test_remove_session() {
        let manager = SessionManager::new();
        let a = manager.create("a");
        let b = manager.create("b");
        let c = manager.create("c");

        assert!(manager.remove(b.id()));
        let names: Vec<_> = manager.list().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert!(manager.get(b.id()).is_none());
        assert!(manager.get(a.id()).is_some());
        assert!(manager.get(c.id()).is_some());
    }

    #[test]
    fn test_remove_nonexistent_session() {
        let manager = SessionManager::new();
        manager.create("a");
        assert!(!manager.remove("nonexistent"));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let manager = SessionManager::new();
        let a = manager.create("a");
        let snapshot = manager.list();
        manager.create("b");
        manager.remove(a.id());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name(), "a");
        assert_eq!(manager.len(), 1);
    }
}
