//! Application state and the UI state machine

use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use tracing::{debug, info};

use pilot_core::session::{
    BackendEvent, PROCESSING_NOTICE, Session, SessionId, SessionManager, SessionStatus,
};

use super::events::{KeyAction, handle_key_help, handle_key_normal};
use super::layout::{Pane, PaneLayout, output_visible_rows};

/// Top-level interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Dashboard with focused pane
    Normal,
    /// Full-screen help; only dismiss keys are handled
    Help,
}

/// Side effect requested by the state machine, executed by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Leave the event loop
    Quit,
    /// Send input to the backend for a session
    Submit { session_id: SessionId, input: String },
    /// Abandon in-flight work for a removed session
    Cancel { session_id: SessionId },
}

/// Populate a store with the sessions shown on first launch
pub fn seed_demo_sessions(store: &SessionManager) {
    let main = store.create("Main Session");
    main.set_status(SessionStatus::Running);
    main.append_output("Welcome to ClaudePilot!");
    main.append_output("This is your main Claude session.");
    main.append_output("Type your commands in the input pane below.");

    let analysis = store.create("Analysis Session");
    analysis.set_status(SessionStatus::Idle);
    analysis.append_output("Analysis session ready for data processing.");

    let debug = store.create("Debug Session");
    debug.set_status(SessionStatus::Error);
    debug.append_output("Error: Connection failed to Claude API");
    debug.append_output("Retrying connection...");
}

/// Main TUI application
pub struct App {
    /// Current interaction mode
    pub mode: Mode,
    /// Pane receiving keyboard input
    pub focus: Pane,
    /// Shared session store
    store: Arc<SessionManager>,
    /// Selected session, re-resolved through the store on every use
    selected: Option<SessionId>,
    /// Index of the selection in list order
    cursor: usize,
    /// Text input buffer, may span several lines
    input: String,
    /// Submitted inputs, oldest first
    history: Vec<String>,
    /// Current position in history (None = not browsing)
    history_index: Option<usize>,
    /// First visible transcript line
    output_scroll: usize,
    /// Terminal size as (width, height)
    size: (u16, u16),
    /// Pane rectangles for hit-testing, None when the terminal is too small
    layout: Option<PaneLayout>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    /// Create the app over a store, selecting its first session
    pub fn new(store: Arc<SessionManager>) -> Self {
        let selected = store.list().first().map(|s| s.id().to_string());
        Self {
            mode: Mode::Normal,
            focus: Pane::SessionList,
            store,
            selected,
            cursor: 0,
            input: String::new(),
            history: Vec::new(),
            history_index: None,
            output_scroll: 0,
            size: (0, 0),
            layout: None,
            should_quit: false,
        }
    }

    pub fn store(&self) -> &SessionManager {
        &self.store
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Resolve the selected session through the store
    pub fn selected_session(&self) -> Option<Arc<Session>> {
        self.selected.as_deref().and_then(|id| self.store.get(id))
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn history_index(&self) -> Option<usize> {
        self.history_index
    }

    pub fn output_scroll(&self) -> usize {
        self.output_scroll
    }

    pub fn layout(&self) -> Option<&PaneLayout> {
        self.layout.as_ref()
    }

    /// Transcript rows that fit in the output pane
    pub fn output_visible_rows(&self) -> usize {
        output_visible_rows(self.size.1)
    }

    /// Largest scroll offset for the selected transcript
    pub fn max_scroll(&self) -> usize {
        self.selected_session()
            .map(|s| s.output_len().saturating_sub(self.output_visible_rows()))
            .unwrap_or(0)
    }

    /// Record a new terminal size and recompute pane rectangles
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.layout = PaneLayout::compute(width, height);
        self.output_scroll = self.output_scroll.min(self.max_scroll());
        debug!("Resized to {}x{}, layout: {:?}", width, height, self.layout);
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let action = match self.mode {
            Mode::Help => handle_key_help(key),
            Mode::Normal => handle_key_normal(key, self.focus),
        };
        self.apply(action)
    }

    /// Apply a classified key action
    pub fn apply(&mut self, action: KeyAction) -> Vec<Effect> {
        match action {
            KeyAction::None => {}
            KeyAction::Quit => {
                info!("Quit requested");
                self.should_quit = true;
                return vec![Effect::Quit];
            }
            KeyAction::ShowHelp => self.mode = Mode::Help,
            KeyAction::CloseHelp => self.mode = Mode::Normal,
            KeyAction::FocusNext => self.focus = self.focus.next(),
            KeyAction::FocusPrev => self.focus = self.focus.prev(),
            KeyAction::Up => match self.focus {
                Pane::SessionList => self.select_prev(),
                _ => self.scroll_up(),
            },
            KeyAction::Down => match self.focus {
                Pane::SessionList => self.select_next(),
                _ => self.scroll_down(),
            },
            KeyAction::Top => self.scroll_to_top(),
            KeyAction::Bottom => self.scroll_to_bottom(),
            KeyAction::NewSession => self.new_session(),
            KeyAction::DeleteSession => return self.delete_selected(),
            KeyAction::ToggleRun => self.toggle_run(),
            KeyAction::Newline => self.input.push('\n'),
            KeyAction::Submit => return self.submit(),
            KeyAction::HistoryPrev => self.history_prev(),
            KeyAction::HistoryNext => self.history_next(),
            KeyAction::Backspace => {
                self.input.pop();
            }
            KeyAction::DeleteWord => self.delete_word(),
            KeyAction::Insert(c) => self.input.push(c),
        }
        Vec::new()
    }

    /// Handle a mouse event against the current pane layout
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.mode == Mode::Help {
            return;
        }
        let Some(layout) = self.layout else {
            return;
        };
        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(pane) = layout.hit_test(column, row) {
                    self.focus = pane;
                    if pane == Pane::SessionList {
                        self.click_session_list(&layout, row);
                    }
                }
            }
            MouseEventKind::ScrollUp => {
                if !layout.contains(self.focus, column, row) {
                    return;
                }
                match self.focus {
                    Pane::SessionList => self.select_prev(),
                    Pane::Output => self.scroll_up(),
                    Pane::Input => {}
                }
            }
            MouseEventKind::ScrollDown => {
                if !layout.contains(self.focus, column, row) {
                    return;
                }
                match self.focus {
                    Pane::SessionList => self.select_next(),
                    Pane::Output => self.scroll_down(),
                    Pane::Input => {}
                }
            }
            _ => {}
        }
    }

    /// Apply a backend completion to its session
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        let Some(session) = self.store.get(event.session_id()) else {
            debug!("Dropping backend event for removed session {}", event.session_id());
            return;
        };
        let is_selected = self.selected.as_deref() == Some(session.id());
        let pinned = is_selected && self.output_scroll >= self.max_scroll();

        match event {
            BackendEvent::Completed { reply, .. } => {
                for line in reply.lines {
                    session.append_output(line);
                }
                if let Some(status) = reply.status {
                    session.set_status(status);
                }
            }
            BackendEvent::Failed { message, .. } => {
                session.set_status(SessionStatus::Error);
                session.append_output(format!("Error: {}", message));
            }
        }

        if pinned {
            self.output_scroll = self.max_scroll();
        }
    }

    fn select_index(&mut self, sessions: &[Arc<Session>], index: usize) {
        self.cursor = index;
        self.selected = sessions.get(index).map(|s| s.id().to_string());
        self.output_scroll = 0;
    }

    fn select_next(&mut self) {
        let sessions = self.store.list();
        if self.cursor + 1 < sessions.len() {
            self.select_index(&sessions, self.cursor + 1);
        }
    }

    fn select_prev(&mut self) {
        if self.cursor > 0 {
            let sessions = self.store.list();
            self.select_index(&sessions, self.cursor - 1);
        }
    }

    fn click_session_list(&mut self, layout: &PaneLayout, row: u16) {
        let sessions = self.store.list();
        if let Some(index) = layout.list_index_at(row)
            && index < sessions.len()
        {
            self.select_index(&sessions, index);
        }
    }

    fn new_session(&mut self) {
        let name = format!("Session {}", self.store.len() + 1);
        let session = self.store.create(&name);
        session.append_output(format!("New session '{}' created", name));

        self.cursor = self.store.len() - 1;
        self.selected = Some(session.id().to_string());
        self.output_scroll = 0;
    }

    fn delete_selected(&mut self) -> Vec<Effect> {
        let Some(session_id) = self.selected.clone() else {
            return Vec::new();
        };
        self.store.remove(&session_id);

        let sessions = self.store.list();
        if sessions.is_empty() {
            self.cursor = 0;
            self.selected = None;
            self.output_scroll = 0;
        } else {
            let index = self.cursor.min(sessions.len() - 1);
            self.select_index(&sessions, index);
        }

        vec![Effect::Cancel { session_id }]
    }

    fn toggle_run(&mut self) {
        let Some(session) = self.selected_session() else {
            return;
        };
        if session.status().is_running() {
            session.set_status(SessionStatus::Stopped);
            session.append_output("Session stopped by user");
        } else {
            session.set_status(SessionStatus::Running);
            session.append_output("Session started");
        }
    }

    fn scroll_up(&mut self) {
        if self.selected_session().is_some() {
            self.output_scroll = self.output_scroll.saturating_sub(1);
        }
    }

    fn scroll_down(&mut self) {
        if self.selected_session().is_some() && self.output_scroll < self.max_scroll() {
            self.output_scroll += 1;
        }
    }

    fn scroll_to_top(&mut self) {
        self.output_scroll = 0;
    }

    fn scroll_to_bottom(&mut self) {
        if self.selected_session().is_some() {
            self.output_scroll = self.max_scroll();
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        if self.input.trim().is_empty() {
            return Vec::new();
        }
        let Some(session) = self.selected_session() else {
            return Vec::new();
        };

        let input = std::mem::take(&mut self.input);
        self.history.push(input.clone());
        self.history_index = None;

        for (i, line) in input.split('\n').enumerate() {
            let prefix = if i == 0 { "> " } else { "  " };
            session.append_output(format!("{}{}", prefix, line));
        }
        session.append_output(PROCESSING_NOTICE);

        self.output_scroll = self.max_scroll();

        vec![Effect::Submit {
            session_id: session.id().to_string(),
            input,
        }]
    }

    /// Navigate to previous history entry
    fn history_prev(&mut self) {
        if self.history.is_empty() || self.input.contains('\n') {
            return;
        }
        let new_index = match self.history_index {
            None => self.history.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.history_index = Some(new_index);
        self.input = self.history[new_index].clone();
    }

    /// Navigate to next history entry
    fn history_next(&mut self) {
        let Some(idx) = self.history_index else {
            return;
        };
        if self.input.contains('\n') {
            return;
        }
        if idx + 1 >= self.history.len() {
            self.history_index = None;
            self.input.clear();
        } else {
            self.history_index = Some(idx + 1);
            self.input = self.history[idx + 1].clone();
        }
    }

    /// Remove the trailing word and the whitespace before it
    fn delete_word(&mut self) {
        let trimmed = self.input.trim_end();
        if trimmed.is_empty() {
            return;
        }
        let word_start = trimmed
            .rfind(char::is_whitespace)
            .map(|i| i + trimmed[i..].chars().next().map_or(1, char::len_utf8))
            .unwrap_or(0);
        let kept = trimmed[..word_start].trim_end_matches(' ').len();
        self.input.truncate(kept);
    }
}
