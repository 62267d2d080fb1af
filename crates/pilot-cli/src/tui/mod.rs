//! TUI (Terminal User Interface) module for Pilot
//!
//! Three panes side by side: the session list on the left, the selected
//! session's transcript top right, and a multiline input editor bottom right.
//! Keyboard and mouse events are turned into state changes by [`App`];
//! [`draw`] renders the current state without changing it.

mod app;
mod events;
mod layout;
mod ui;

pub use app::{App, Effect, seed_demo_sessions};
pub use events::{Event, EventHandler};
pub use ui::draw;
