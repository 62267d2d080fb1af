//! Session module - sessions, the session store, and the backend seam
//!
//! Key components:
//!
//! - `Session`: one conversation with its own status and transcript
//! - `SessionManager`: ordered, thread-safe store of sessions
//! - `Backend`/`Dispatcher`: asynchronous submission of user input
//!
//! # Architecture
//!
//! ```text
//! ┌──────────── event loop ─────────────┐
//! │                                      │
//! │  SessionManager ──▶ [Session, ...]   │
//! │        ▲                             │
//! │        │ apply BackendEvent          │
//! │        │                             │
//! │  Dispatcher::submit(id, input) ──────┼──▶ tokio task ──▶ Backend
//! │        ▲                             │          │
//! │        └──────── event_rx ◀──────────┼──────────┘
//! └──────────────────────────────────────┘
//! ```

mod backend;
mod dispatcher;
mod manager;
mod state;
mod types;

pub use backend::{Backend, BackendReply, SimulatedBackend};
pub use dispatcher::{BackendEvent, Dispatcher, EventReceiver};
pub use manager::SessionManager;
pub use state::Session;
pub use types::{
    PROCESSING_NOTICE, SessionId, SessionSnapshot, SessionStatus, new_session_id,
    simulated_response,
};
