//! Pilot Core - Sessions and the session store for the Pilot dashboard
//!
//! This crate provides:
//! - Sessions with internally synchronized status and transcript
//! - An ordered, thread-safe session store
//! - The asynchronous backend seam and its dispatcher
//! - Configuration loading

pub mod config;
pub mod error;
pub mod session;

pub use config::{Config, ConfigManager};
pub use error::{Error, Result};

// Session exports
pub use session::{
    Backend, BackendEvent, BackendReply, Dispatcher, EventReceiver, PROCESSING_NOTICE, Session,
    SessionId, SessionManager, SessionSnapshot, SessionStatus, SimulatedBackend,
};
