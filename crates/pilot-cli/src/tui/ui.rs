//! UI rendering for the TUI
//!
//! Drawing reads the app state only; every pane is placed at the rectangle
//! [`PaneLayout`] computes for the frame, the same rectangles mouse
//! hit-testing uses.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use pilot_core::session::{SessionSnapshot, SessionStatus};

use super::app::{App, Mode};
use super::layout::{MIN_HEIGHT, MIN_WIDTH, Pane, PaneLayout};

const ACCENT: Color = Color::Rgb(0x7C, 0x3A, 0xED);
const MUTED: Color = Color::Rgb(0x6B, 0x72, 0x80);
const INPUT_PROMPT: &str = "➤ ";
const PREVIEW_WIDTH: usize = 20;

/// Draw the entire UI
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.mode == Mode::Help {
        draw_help(frame, area);
        return;
    }

    let Some(layout) = PaneLayout::compute(area.width, area.height) else {
        draw_too_small(frame, area);
        return;
    };

    draw_title(frame, area);
    draw_session_list(frame, app, layout.list);
    draw_output(frame, app, layout.output);
    draw_input(frame, app, layout.input);
    draw_footer(frame, app, area);
}

fn draw_too_small(frame: &mut Frame, area: Rect) {
    let text = format!(
        "Terminal too small. Please resize to at least {}x{}.",
        MIN_WIDTH, MIN_HEIGHT
    );
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        " ClaudePilot - Claude Session Manager ",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, Rect::new(area.x, area.y, area.width, 1));
}

/// Bordered block for a pane, highlighted when focused
fn pane_block(pane: Pane, focused: bool) -> Block<'static> {
    let (title, style) = if focused {
        (
            format!(" ● {} ", pane.title()),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )
    } else {
        (format!(" {} ", pane.title()), Style::default().fg(MUTED))
    };

    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style)
        .title(Span::styled(title, style))
}

fn status_style(status: SessionStatus) -> Style {
    let color = match status {
        SessionStatus::Idle => Color::Gray,
        SessionStatus::Running => Color::Green,
        SessionStatus::Connecting => Color::Yellow,
        SessionStatus::Error => Color::Red,
        SessionStatus::Stopped => MUTED,
    };
    Style::default().fg(color)
}

/// Draw the session list; every entry takes exactly two rows
fn draw_session_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Pane::SessionList;
    let block = pane_block(Pane::SessionList, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sessions = app.store().list();
    if sessions.is_empty() {
        let empty = Paragraph::new("No sessions. Press 'n' to create one.")
            .style(Style::default().fg(MUTED))
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, inner);
        return;
    }

    let mut lines = Vec::with_capacity(sessions.len() * 2);
    for (i, session) in sessions.iter().enumerate() {
        let snapshot = session.snapshot();
        let name_style = if i == app.cursor() {
            let base = Style::default().add_modifier(Modifier::BOLD);
            if focused {
                base.fg(Color::Black).bg(ACCENT)
            } else {
                base.fg(ACCENT)
            }
        } else {
            Style::default()
        };

        lines.push(Line::from(vec![
            Span::styled(snapshot.status.indicator(), status_style(snapshot.status)),
            Span::raw(" "),
            Span::styled(snapshot.name.clone(), name_style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", preview(&snapshot)),
            Style::default().fg(MUTED),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Short preview of a session's last message
fn preview(snapshot: &SessionSnapshot) -> String {
    snapshot
        .last_message
        .as_deref()
        .map(|m| truncate_width(m, PREVIEW_WIDTH))
        .unwrap_or_default()
}

/// Truncate to a display width, adding "..." if needed
fn truncate_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let budget = max.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Draw the selected session's transcript from the scroll offset
///
/// Lines are not wrapped: one transcript line is one row, which is what the
/// scroll offset and `App::max_scroll` count. Overlong lines are clipped.
fn draw_output(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Pane::Output;
    let mut block = pane_block(Pane::Output, focused);

    let Some(session) = app.selected_session() else {
        let paragraph = Paragraph::new("Select a session to view output")
            .style(Style::default().fg(MUTED))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let snapshot = session.snapshot();
    block = block.title_bottom(
        Line::from(Span::styled(
            format!(
                " {} · {} · {} ",
                snapshot.name,
                snapshot.status,
                snapshot.updated_at.with_timezone(&chrono::Local).format("%H:%M:%S")
            ),
            Style::default().fg(MUTED),
        ))
        .alignment(Alignment::Right),
    );

    if snapshot.output.is_empty() {
        let paragraph = Paragraph::new("No output yet...")
            .style(Style::default().fg(MUTED))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = app.output_visible_rows();
    let lines: Vec<Line> = snapshot
        .output
        .iter()
        .skip(app.output_scroll())
        .take(visible)
        .map(|line| Line::from(line.as_str()))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draw the multiline input editor, showing the last lines that fit
fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Pane::Input;
    let block = pane_block(Pane::Input, focused);
    let inner = block.inner(area);

    let mut text = app.input().to_string();
    if focused {
        text.push('█');
    }

    let indent = " ".repeat(INPUT_PROMPT.width());
    let mut lines: Vec<Line> = text
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let prompt = if i == 0 {
                Span::styled(INPUT_PROMPT, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
            } else {
                Span::raw(indent.clone())
            };
            Line::from(vec![prompt, Span::raw(line.to_string())])
        })
        .collect();

    let available = inner.height as usize;
    if lines.len() > available {
        lines.drain(..lines.len() - available);
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn footer_keys(focus: Pane) -> Vec<&'static str> {
    let mut keys = vec!["Tab: Switch panes", "?: Help", "Ctrl+C: Quit"];
    match focus {
        Pane::SessionList => keys.extend(["n: New", "d: Delete", "s: Start/Stop"]),
        Pane::Output => keys.extend(["j/k: Scroll", "g/G: Top/Bottom"]),
        Pane::Input => keys.extend(["Enter: New line", "Ctrl+Enter: Send", "↑/↓: History"]),
    }
    keys
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let footer = Paragraph::new(footer_keys(app.focus).join("  |  "))
        .style(Style::default().fg(MUTED));
    let row = area.y + area.height - 1;
    frame.render_widget(footer, Rect::new(area.x, row, area.width, 1));
}

fn help_lines() -> Vec<Line<'static>> {
    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
    };

    vec![
        heading("ClaudePilot Help"),
        Line::from(""),
        heading("Global Keys:"),
        Line::from("  Tab / Shift+Tab    Switch between panes"),
        Line::from("  ?                  Show/hide this help"),
        Line::from("  Ctrl+C             Quit application"),
        Line::from(""),
        heading("Mouse Controls:"),
        Line::from("  Click              Focus panel and select items"),
        Line::from("  Scroll Wheel       Navigate list or scroll output of the focused pane"),
        Line::from(""),
        heading("Session List (Left Pane):"),
        Line::from("  j / ↓              Move cursor down"),
        Line::from("  k / ↑              Move cursor up"),
        Line::from("  n                  Create new session"),
        Line::from("  d / x              Delete selected session"),
        Line::from("  s                  Start/stop selected session"),
        Line::from(""),
        heading("Output Pane (Top Right):"),
        Line::from("  j / ↓  k / ↑       Scroll down / up"),
        Line::from("  g / Home           Go to top"),
        Line::from("  G / End            Go to bottom"),
        Line::from(""),
        heading("Input Pane (Bottom Right):"),
        Line::from("  Enter              Create new line"),
        Line::from("  Ctrl+Enter         Send message (also Alt+Enter, Ctrl+S)"),
        Line::from("  ↑ / ↓              Navigate command history"),
        Line::from("  Backspace          Delete character"),
        Line::from("  Ctrl+Backspace     Delete word backward (also Ctrl+W)"),
        Line::from(""),
        Line::from(Span::styled(
            "Press '?' or 'Esc' to close this help",
            Style::default().fg(MUTED),
        )),
    ]
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT))
        .title(" Help ");
    let paragraph = Paragraph::new(help_lines())
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::seed_demo_sessions;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pilot_core::session::SessionManager;
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Arc;

    /// Render the app to a test buffer and return the content as a string.
    fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buf = terminal.backend().buffer();
        let area = buf.area;
        let mut lines = Vec::new();
        for y in area.y..area.y + area.height {
            let mut line = String::new();
            for x in area.x..area.x + area.width {
                line.push_str(buf[(x, y)].symbol());
            }
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    fn demo_app(width: u16, height: u16) -> App {
        let store = Arc::new(SessionManager::new());
        seed_demo_sessions(&store);
        let mut app = App::new(store);
        app.handle_resize(width, height);
        app
    }

    #[test]
    fn renders_too_small_notice() {
        let app = demo_app(40, 10);
        let screen = render_to_string(&app, 40, 10);
        assert!(screen.contains("Terminal too small"));
        assert!(!screen.contains("Sessions"));
    }

    #[test]
    fn renders_panes() {
        let app = demo_app(100, 30);
        let screen = render_to_string(&app, 100, 30);
        assert!(screen.contains("ClaudePilot - Claude Session Manager"));
        assert!(screen.contains("● Sessions"));
        assert!(screen.contains(" Output "));
        assert!(screen.contains(" Input "));
        assert!(screen.contains("Main Session"));
        assert!(screen.contains("Debug Session"));
        assert!(screen.contains("Welcome to ClaudePilot!"));
        assert!(screen.contains("n: New"));
    }

    #[test]
    fn session_entries_are_two_rows_apart() {
        let app = demo_app(100, 30);
        let screen = render_to_string(&app, 100, 30);
        let rows: Vec<&str> = screen.lines().collect();
        let layout = PaneLayout::compute(100, 30).unwrap();
        let first = layout.list.y as usize + 1;

        assert!(rows[first].contains("Main Session"));
        assert!(rows[first + 2].contains("Analysis Session"));
        assert!(rows[first + 4].contains("Debug Session"));
    }

    #[test]
    fn renders_help() {
        let mut app = demo_app(100, 40);
        app.handle_key(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE));
        let screen = render_to_string(&app, 100, 40);
        assert!(screen.contains("ClaudePilot Help"));
        assert!(screen.contains("Press '?' or 'Esc' to close this help"));
        assert!(!screen.contains("Main Session"));
    }

    #[test]
    fn renders_input_with_cursor() {
        let mut app = demo_app(100, 30);
        app.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        for c in "hi".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        let screen = render_to_string(&app, 100, 30);
        assert!(screen.contains("● Input"));
        assert!(screen.contains("➤ hi█"));
        assert!(screen.contains("Ctrl+Enter: Send"));
    }

    #[test]
    fn long_transcript_line_takes_one_row() {
        let store = Arc::new(SessionManager::new());
        let session = store.create("s");
        session.append_output("A".repeat(200));
        session.append_output("next");
        let mut app = App::new(store);
        app.handle_resize(100, 30);

        let screen = render_to_string(&app, 100, 30);
        let rows: Vec<&str> = screen.lines().collect();
        // Output pane is x=35 width 65, so its inner text starts at column 36
        let inner = |row: &str| row.chars().skip(36).take(63).collect::<String>();
        assert_eq!(inner(rows[3]), "A".repeat(63));
        assert!(inner(rows[4]).starts_with("next"));
        assert_eq!(app.max_scroll(), 0);
    }

    #[test]
    fn empty_store_prompts_creation() {
        let mut app = App::new(Arc::new(SessionManager::new()));
        app.handle_resize(120, 30);
        let screen = render_to_string(&app, 120, 30);
        assert!(screen.contains("No sessions. Press 'n' to create one."));
        assert!(screen.contains("Select a session to view output"));
    }

    #[test]
    fn truncates_preview_by_width() {
        assert_eq!(truncate_width("short", 20), "short");
        assert_eq!(
            truncate_width("Type your commands in the input pane below.", 20),
            "Type your command..."
        );
        assert_eq!(truncate_width("日本語日本語日本語日本語", 10), "日本語...");
    }
}
