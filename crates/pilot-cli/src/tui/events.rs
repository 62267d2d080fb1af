//! Event handling for the TUI

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

use pilot_core::session::{BackendEvent, EventReceiver};

use super::layout::Pane;

/// Events that can occur in the TUI
#[derive(Debug)]
pub enum Event {
    /// Terminal event (key press, mouse, resize, etc.)
    Terminal(CrosstermEvent),
    /// Completion of a backend submission
    Backend(BackendEvent),
    /// Tick for UI refresh
    Tick,
}

/// Event handler that polls for terminal events and backend completions
pub struct EventHandler {
    /// Receiver for events
    rx: mpsc::UnboundedReceiver<Event>,
    /// Sender for events (kept so the channel outlives the producers)
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(mut backend_rx: EventReceiver, tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_backend = tx.clone();

        // Spawn terminal event polling thread
        let tx_terminal = tx.clone();
        std::thread::spawn(move || {
            loop {
                // Poll with a timeout so ticks keep flowing while idle
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read()
                        && tx_terminal.send(Event::Terminal(evt)).is_err()
                    {
                        break;
                    }
                } else if tx_terminal.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        // Spawn backend event forwarding task
        tokio::spawn(async move {
            while let Some(event) = backend_rx.recv().await {
                if tx_backend.send(Event::Backend(event)).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Result of classifying a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Quit the application
    Quit,
    /// Open the help screen
    ShowHelp,
    /// Close the help screen
    CloseHelp,
    /// Focus the next pane
    FocusNext,
    /// Focus the previous pane
    FocusPrev,
    /// Move the list cursor or scroll up
    Up,
    /// Move the list cursor or scroll down
    Down,
    /// Scroll to the top
    Top,
    /// Scroll to the bottom
    Bottom,
    /// Create a session
    NewSession,
    /// Delete the selected session
    DeleteSession,
    /// Start or stop the selected session
    ToggleRun,
    /// Insert a line break into the input
    Newline,
    /// Submit the input
    Submit,
    /// History previous
    HistoryPrev,
    /// History next
    HistoryNext,
    /// Delete the last character
    Backspace,
    /// Delete the last word
    DeleteWord,
    /// Insert a character
    Insert(char),
}

fn is_ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

fn is_ctrl_or_alt(key: &KeyEvent) -> bool {
    key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

/// Handle a key event while the help screen is shown
pub fn handle_key_help(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => KeyAction::CloseHelp,
        _ => KeyAction::None,
    }
}

/// Handle a key event in normal mode for the focused pane
pub fn handle_key_normal(key: KeyEvent, focus: Pane) -> KeyAction {
    // Global keys take precedence over pane bindings
    match key.code {
        KeyCode::Char('c') if is_ctrl(&key) => return KeyAction::Quit,
        KeyCode::Char('?') => return KeyAction::ShowHelp,
        KeyCode::BackTab => return KeyAction::FocusPrev,
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
            return KeyAction::FocusPrev;
        }
        KeyCode::Tab => return KeyAction::FocusNext,
        _ => {}
    }

    match focus {
        Pane::SessionList => handle_key_session_list(key),
        Pane::Output => handle_key_output(key),
        Pane::Input => handle_key_input(key),
    }
}

fn handle_key_session_list(key: KeyEvent) -> KeyAction {
    if is_ctrl_or_alt(&key) {
        return KeyAction::None;
    }
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => KeyAction::Down,
        KeyCode::Char('k') | KeyCode::Up => KeyAction::Up,
        KeyCode::Char('n') => KeyAction::NewSession,
        KeyCode::Char('d') | KeyCode::Char('x') => KeyAction::DeleteSession,
        KeyCode::Char('s') => KeyAction::ToggleRun,
        _ => KeyAction::None,
    }
}

fn handle_key_output(key: KeyEvent) -> KeyAction {
    if is_ctrl_or_alt(&key) {
        return KeyAction::None;
    }
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => KeyAction::Down,
        KeyCode::Char('k') | KeyCode::Up => KeyAction::Up,
        KeyCode::Char('g') | KeyCode::Home => KeyAction::Top,
        KeyCode::Char('G') | KeyCode::End => KeyAction::Bottom,
        _ => KeyAction::None,
    }
}

fn handle_key_input(key: KeyEvent) -> KeyAction {
    match key.code {
        // Modified Enter submits; needs keyboard enhancement on most terminals
        KeyCode::Enter if is_ctrl_or_alt(&key) => KeyAction::Submit,
        KeyCode::Char('s') if is_ctrl(&key) => KeyAction::Submit,
        KeyCode::Enter => KeyAction::Newline,
        KeyCode::Up => KeyAction::HistoryPrev,
        KeyCode::Down => KeyAction::HistoryNext,
        KeyCode::Backspace if is_ctrl_or_alt(&key) => KeyAction::DeleteWord,
        KeyCode::Char('w') if is_ctrl(&key) => KeyAction::DeleteWord,
        // Terminals with `stty erase ^H` send Backspace as Ctrl+H
        KeyCode::Char('h') if is_ctrl(&key) => KeyAction::Backspace,
        KeyCode::Backspace => KeyAction::Backspace,
        KeyCode::Char(c) if !is_ctrl_or_alt(&key) => KeyAction::Insert(c),
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn test_global_keys_in_every_pane() {
        for pane in [Pane::SessionList, Pane::Output, Pane::Input] {
            assert_eq!(handle_key_normal(ctrl(KeyCode::Char('c')), pane), KeyAction::Quit);
            assert_eq!(handle_key_normal(key(KeyCode::Char('?')), pane), KeyAction::ShowHelp);
            assert_eq!(handle_key_normal(key(KeyCode::Tab), pane), KeyAction::FocusNext);
            assert_eq!(
                handle_key_normal(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), pane),
                KeyAction::FocusPrev
            );
        }
    }

    #[test]
    fn test_help_keys() {
        assert_eq!(handle_key_help(key(KeyCode::Esc)), KeyAction::CloseHelp);
        assert_eq!(handle_key_help(key(KeyCode::Char('q'))), KeyAction::CloseHelp);
        assert_eq!(handle_key_help(key(KeyCode::Char('?'))), KeyAction::CloseHelp);
        assert_eq!(handle_key_help(key(KeyCode::Tab)), KeyAction::None);
        assert_eq!(handle_key_help(ctrl(KeyCode::Char('c'))), KeyAction::None);
    }

    #[test]
    fn test_pane_specific_bindings() {
        let list = |code| handle_key_normal(key(code), Pane::SessionList);
        let output = |code| handle_key_normal(key(code), Pane::Output);
        let input = |code| handle_key_normal(key(code), Pane::Input);

        assert_eq!(list(KeyCode::Char('j')), KeyAction::Down);
        assert_eq!(list(KeyCode::Char('x')), KeyAction::DeleteSession);
        assert_eq!(output(KeyCode::Char('G')), KeyAction::Bottom);
        assert_eq!(output(KeyCode::Char('n')), KeyAction::None);
        assert_eq!(input(KeyCode::Char('j')), KeyAction::Insert('j'));
        assert_eq!(input(KeyCode::Up), KeyAction::HistoryPrev);
    }

    #[test]
    fn test_enter_variants() {
        assert_eq!(handle_key_normal(key(KeyCode::Enter), Pane::Input), KeyAction::Newline);
        assert_eq!(handle_key_normal(ctrl(KeyCode::Enter), Pane::Input), KeyAction::Submit);
        assert_eq!(
            handle_key_normal(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT), Pane::Input),
            KeyAction::Submit
        );
        assert_eq!(handle_key_normal(ctrl(KeyCode::Char('s')), Pane::Input), KeyAction::Submit);
    }

    #[test]
    fn test_backspace_variants() {
        assert_eq!(handle_key_normal(key(KeyCode::Backspace), Pane::Input), KeyAction::Backspace);
        assert_eq!(handle_key_normal(ctrl(KeyCode::Backspace), Pane::Input), KeyAction::DeleteWord);
        assert_eq!(handle_key_normal(ctrl(KeyCode::Char('w')), Pane::Input), KeyAction::DeleteWord);
        assert_eq!(handle_key_normal(ctrl(KeyCode::Char('h')), Pane::Input), KeyAction::Backspace);
    }

    #[test]
    fn test_shifted_chars_insert() {
        let upper = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(handle_key_normal(upper, Pane::Input), KeyAction::Insert('A'));
        assert_eq!(handle_key_normal(ctrl(KeyCode::Char('a')), Pane::Input), KeyAction::None);
    }
}
