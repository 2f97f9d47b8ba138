//! # MovieGrid Component
//!
//! Responsive grid of poster cells.
//!
//! ## Layout
//!
//! Cells target a fixed width (`item_width`, from config). The number of
//! columns is however many targets fit the available width (at least one);
//! the leftover space is shared out so cells fill the row:
//!
//! ```text
//! ┌──────────────────┐┌──────────────────┐┌──────────────────┐
//! │ ░░░░░░░░░░░░░░░░ ││ ░░░░░░░░░░░░░░░░ ││     no poster    │
//! │ ░░░░░░░░░░░░░░░░ ││ ░░░░░░░░░░░░░░░░ ││                  │
//! │ 2010 · movie     ││ 2005 · movie     ││ 1933 · movie     │
//! │ The King's Spee… ││ King Kong        ││ King Kong        │
//! └──────────────────┘└──────────────────┘└──────────────────┘
//! ```
//!
//! `MovieGrid` is created each frame around `&mut MovieGridState`, which
//! caches the geometry used for keyboard navigation and mouse hit testing.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::search::Movie;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Rows per cell: border, two poster rows, year line, title line, border.
pub const CELL_HEIGHT: u16 = 6;
const POSTER_ROWS: usize = 2;
const ELLIPSIS: char = '…';

/// High-level events emitted by the grid
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// A cell was chosen with Enter.
    Select(usize),
    /// Up pressed on the first row.
    LeaveTop,
}

/// Number of columns for `width` available columns and a target cell width.
pub fn grid_columns(width: u16, item_width: u16) -> usize {
    (width / item_width.max(1)).max(1) as usize
}

/// Truncates `text` to one line of at most `max_width` columns, ending in `…` when cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.width() <= max_width {
        return line.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let budget = max_width - 1;
    let mut out = String::new();
    let mut used = 0;
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    out
}

/// Geometry and selection for the grid.
/// Must be persisted in the parent TuiState.
pub struct MovieGridState {
    pub scroll_state: ScrollViewState,
    pub selected: Option<usize>,
    /// Target cell width (config)
    pub item_width: u16,
    // Cached by the last render
    item_count: usize,
    columns: usize,
    cell_width: u16,
    viewport_height: u16,
}

impl MovieGridState {
    pub fn new(item_width: u16) -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            selected: None,
            item_width,
            item_count: 0,
            columns: 1,
            cell_width: item_width,
            viewport_height: 0,
        }
    }

    /// Forget selection and scroll (new result set incoming).
    pub fn reset(&mut self) {
        self.scroll_state = ScrollViewState::default();
        self.selected = None;
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Recomputes the cached geometry for `count` items in `area`.
    pub fn layout(&mut self, count: usize, area: Rect) {
        // One column is kept for the scrollbar.
        let content_width = area.width.saturating_sub(1);
        self.item_count = count;
        self.columns = grid_columns(content_width, self.item_width);
        self.cell_width = (content_width / self.columns as u16).max(1);
        self.viewport_height = area.height;
        self.selected = match self.selected {
            Some(_) if count == 0 => None,
            Some(i) => Some(i.min(count - 1)),
            None => None,
        };
    }

    fn rows(&self) -> usize {
        self.item_count.div_ceil(self.columns)
    }

    fn content_height(&self) -> u16 {
        (self.rows() as u16).saturating_mul(CELL_HEIGHT)
    }

    fn cell_rect(&self, index: usize) -> Rect {
        let col = (index % self.columns) as u16;
        let row = (index / self.columns) as u16;
        Rect::new(col * self.cell_width, row * CELL_HEIGHT, self.cell_width, CELL_HEIGHT)
    }

    /// Index of the cell under screen position (`x`, `y`) for a grid rendered into `area`.
    pub fn hit_test(&self, x: u16, y: u16, area: Rect) -> Option<usize> {
        if !area.contains(Position::new(x, y)) {
            return None;
        }
        let rel_x = x - area.x;
        if rel_x >= self.cell_width * self.columns as u16 {
            return None;
        }
        let content_y = (y - area.y) + self.scroll_state.offset().y;
        let index = (content_y / CELL_HEIGHT) as usize * self.columns + (rel_x / self.cell_width) as usize;
        (index < self.item_count).then_some(index)
    }

    /// Scroll so the selected cell is fully visible.
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected else {
            return;
        };
        let top = self.cell_rect(idx).y;
        let bottom = top + CELL_HEIGHT;
        let offset_y = self.scroll_state.offset().y;
        if top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: top });
        } else if bottom > offset_y + self.viewport_height {
            let new_y = bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
        }
    }

    fn select(&mut self, idx: usize) {
        self.selected = Some(idx);
        self.scroll_to_selected();
    }
}

impl EventHandler for MovieGridState {
    type Event = GridEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.item_count == 0 {
            return match event {
                TuiEvent::CursorUp => Some(GridEvent::LeaveTop),
                _ => None,
            };
        }
        let last = self.item_count - 1;
        match event {
            TuiEvent::CursorLeft => {
                let idx = self.selected.map_or(0, |i| i.saturating_sub(1));
                self.select(idx);
                None
            }
            TuiEvent::CursorRight => {
                let idx = self.selected.map_or(0, |i| (i + 1).min(last));
                self.select(idx);
                None
            }
            TuiEvent::CursorUp => match self.selected {
                Some(i) if i >= self.columns => {
                    self.select(i - self.columns);
                    None
                }
                _ => Some(GridEvent::LeaveTop),
            },
            TuiEvent::CursorDown => {
                let idx = match self.selected {
                    None => 0,
                    Some(i) if i + self.columns <= last => i + self.columns,
                    // Partial last row: drop to its last cell
                    Some(i) if i / self.columns < last / self.columns => last,
                    Some(i) => i,
                };
                self.select(idx);
                None
            }
            TuiEvent::Home => {
                self.select(0);
                None
            }
            TuiEvent::End => {
                self.select(last);
                None
            }
            TuiEvent::Submit => self.selected.map(GridEvent::Select),
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                None
            }
            _ => None,
        }
    }
}

/// Per-frame wrapper: props plus the persistent state.
pub struct MovieGrid<'a> {
    pub state: &'a mut MovieGridState,
    pub movies: &'a [Movie],
    /// Whether keyboard focus is on the grid (selection highlighted)
    pub focused: bool,
}

fn poster_lines(movie: &Movie, inner_width: usize) -> Vec<Line<'static>> {
    if movie.poster_url().is_some() {
        let fill = "░".repeat(inner_width);
        (0..POSTER_ROWS)
            .map(|_| Line::from(Span::styled(fill.clone(), Style::default().fg(Color::DarkGray))))
            .collect()
    } else {
        let mut lines = vec![
            Line::from(Span::styled(
                truncate_to_width("no poster", inner_width),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ))
            .centered(),
        ];
        lines.resize(POSTER_ROWS, Line::default());
        lines
    }
}

fn cell_paragraph(movie: &Movie, width: u16, selected: bool) -> Paragraph<'static> {
    let inner_width = width.saturating_sub(2) as usize;
    let border_style = if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM)
    };

    let mut lines = poster_lines(movie, inner_width);
    let meta = match (movie.year.is_empty(), movie.kind.is_empty()) {
        (false, false) => format!("{} · {}", movie.year, movie.kind),
        (false, true) => movie.year.clone(),
        (true, false) => movie.kind.clone(),
        (true, true) => String::new(),
    };
    lines.push(Line::from(Span::styled(
        truncate_to_width(&meta, inner_width),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        truncate_to_width(&movie.title, inner_width),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));

    let style = if selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };
    Paragraph::new(lines).style(style).block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style),
    )
}

impl Component for MovieGrid<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.layout(self.movies.len(), area);
        let content_width = area.width.saturating_sub(1);

        let mut scroll_view = ScrollView::new(Size::new(content_width, self.state.content_height()))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for (index, movie) in self.movies.iter().enumerate() {
            let rect = self.state.cell_rect(index);
            let selected = self.focused && self.state.selected == Some(index);
            scroll_view.render_widget(cell_paragraph(movie, rect.width, selected), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
