//! Pane geometry and mouse hit-testing
//!
//! Rectangles are derived from the terminal size alone and are consulted only
//! by the mouse handlers and the renderer, never by keyboard handling.

use ratatui::layout::{Position, Rect};

/// Smallest terminal the dashboard can be drawn in
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 15;

/// Rows above the panes (title line plus spacing)
const TITLE_ROWS: u16 = 2;
/// Rows below the panes (spacing plus footer line)
const FOOTER_ROWS: u16 = 2;
/// Columns between the session list and the right-hand column
const GUTTER: u16 = 2;
/// Border rows around a pane's content
const PANE_CHROME_ROWS: u16 = 2;
/// Display rows per session list entry (name line + preview line)
pub const LIST_ITEM_HEIGHT: u16 = 2;

/// The three dashboard panes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    SessionList,
    Output,
    Input,
}

impl Pane {
    /// Next pane in Tab order
    pub fn next(self) -> Self {
        match self {
            Self::SessionList => Self::Output,
            Self::Output => Self::Input,
            Self::Input => Self::SessionList,
        }
    }

    /// Previous pane in Tab order
    pub fn prev(self) -> Self {
        match self {
            Self::SessionList => Self::Input,
            Self::Output => Self::SessionList,
            Self::Input => Self::Output,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::SessionList => "Sessions",
            Self::Output => "Output",
            Self::Input => "Input",
        }
    }
}

/// Screen rectangles of the panes for one terminal size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    pub list: Rect,
    pub output: Rect,
    pub input: Rect,
}

impl PaneLayout {
    /// Compute the layout, or `None` when the terminal is too small
    pub fn compute(width: u16, height: u16) -> Option<Self> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return None;
        }

        let left = width / 3;
        let right = width - left - GUTTER;
        let right_x = left + GUTTER;
        let output_height = height / 2 - TITLE_ROWS;
        let input_y = TITLE_ROWS + output_height;

        Some(Self {
            list: Rect::new(0, TITLE_ROWS, left, height - TITLE_ROWS - FOOTER_ROWS),
            output: Rect::new(right_x, TITLE_ROWS, right, output_height),
            input: Rect::new(right_x, input_y, right, height - input_y - FOOTER_ROWS),
        })
    }

    /// First pane (list, output, input order) containing the point
    pub fn hit_test(&self, column: u16, row: u16) -> Option<Pane> {
        let pos = Position::new(column, row);
        [
            (Pane::SessionList, self.list),
            (Pane::Output, self.output),
            (Pane::Input, self.input),
        ]
        .into_iter()
        .find(|(_, rect)| rect.contains(pos))
        .map(|(pane, _)| pane)
    }

    /// Whether the point lies inside `pane`
    pub fn contains(&self, pane: Pane, column: u16, row: u16) -> bool {
        self.rect(pane).contains(Position::new(column, row))
    }

    pub fn rect(&self, pane: Pane) -> Rect {
        match pane {
            Pane::SessionList => self.list,
            Pane::Output => self.output,
            Pane::Input => self.input,
        }
    }

    /// Session list index under a screen row, before range checking
    pub fn list_index_at(&self, row: u16) -> Option<usize> {
        let first_item_row = self.list.y + 1;
        if row < first_item_row {
            return None;
        }
        Some(((row - first_item_row) / LIST_ITEM_HEIGHT) as usize)
    }
}

/// Visible transcript rows in the output pane for a terminal height
pub fn output_visible_rows(height: u16) -> usize {
    PaneLayout::compute(MIN_WIDTH, height.max(MIN_HEIGHT))
        .map(|layout| layout.output.height.saturating_sub(PANE_CHROME_ROWS) as usize)
        .unwrap_or(0)
}
