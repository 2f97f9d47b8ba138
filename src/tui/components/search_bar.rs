//! # SearchBar Component
//!
//! Single-line query field with one action button on its right edge.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, backspace/delete, cursor movement)
//! - Emit the full edited text after every change
//! - Emit `Activate` for Enter, which the parent maps to search or clear
//! - Show the button as "search" or "clear" depending on the clear affordance
//!
//! ## State Management
//!
//! The query text is owned by the core `App`; the bar keeps a synced copy
//! (see [`SearchBar::sync`]) plus its own cursor position.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const PLACEHOLDER: &str = "Find Your Movie";
/// Columns reserved inside the border for the action button.
pub const BUTTON_WIDTH: u16 = 10;
pub const HEIGHT: u16 = 3;

/// High-level events emitted by the SearchBar
#[derive(Debug, Clone, PartialEq)]
pub enum SearchBarEvent {
    /// Text changed; carries the full new text.
    Edited(String),
    /// Enter pressed or button clicked.
    Activate,
}

pub struct SearchBar {
    /// Query text (synced from App)
    pub text: String,
    /// Whether the button shows "clear" (Prop)
    pub show_clear: bool,
    /// Whether keystrokes go to this bar (Prop)
    pub focused: bool,
    /// Cursor position in chars
    cursor: usize,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBar {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            show_clear: false,
            focused: true,
            cursor: 0,
        }
    }

    /// Adopts the App's query text. An external change moves the cursor to the end.
    pub fn sync(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.cursor = self.char_count();
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn insert_str(&mut self, s: &str) {
        let at = self.byte_index(self.cursor);
        self.text.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Area of the action button for a bar rendered into `area`.
    pub fn button_area(area: Rect) -> Rect {
        let inner = Block::bordered().inner(area);
        let [_, button] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(BUTTON_WIDTH)]).areas(inner);
        button
    }

    fn button_label(&self) -> &'static str {
        if self.show_clear { "✕ clear" } else { "⌕ search" }
    }
}

/// Returns the tail of `text` that fits in `width` columns with the cursor visible,
/// plus the cursor's column within that tail.
fn visible_window(text: &str, cursor: usize, width: u16) -> (String, u16) {
    let width = width as usize;
    let before: String = text.chars().take(cursor).collect();
    let mut skip = 0;
    // Keep one column free for the cursor itself.
    while skip < cursor && before.chars().skip(skip).collect::<String>().width() >= width.max(1) {
        skip += 1;
    }
    let shown: String = text.chars().skip(skip).collect();
    let cursor_col = before.chars().skip(skip).collect::<String>().width() as u16;
    (shown, cursor_col)
}

impl Component for SearchBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [field_area, button_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(BUTTON_WIDTH)]).areas(inner);

        if self.text.is_empty() {
            let placeholder = Paragraph::new(Span::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ));
            frame.render_widget(placeholder, field_area);
            if self.focused {
                frame.set_cursor_position(Position::new(field_area.x, field_area.y));
            }
        } else {
            let (shown, cursor_col) = visible_window(&self.text, self.cursor, field_area.width);
            frame.render_widget(Paragraph::new(shown), field_area);
            if self.focused {
                frame.set_cursor_position(Position::new(field_area.x + cursor_col, field_area.y));
            }
        }

        let button = Paragraph::new(Line::from(Span::styled(
            self.button_label(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )))
        .right_aligned();
        frame.render_widget(button, button_area);
    }
}

impl EventHandler for SearchBar {
    type Event = SearchBarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut buf = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut buf));
                Some(SearchBarEvent::Edited(self.text.clone()))
            }
            TuiEvent::Paste(data) => {
                // Single-line field: newlines become spaces
                let cleaned: String = data
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                if cleaned.is_empty() {
                    return None;
                }
                self.insert_str(&cleaned);
                Some(SearchBarEvent::Edited(self.text.clone()))
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.text.remove(at);
                Some(SearchBarEvent::Edited(self.text.clone()))
            }
            TuiEvent::Delete => {
                if self.cursor >= self.char_count() {
                    return None;
                }
                let at = self.byte_index(self.cursor);
                self.text.remove(at);
                Some(SearchBarEvent::Edited(self.text.clone()))
            }
            TuiEvent::CursorLeft => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                None
            }
            TuiEvent::Home => {
                self.cursor = 0;
                None
            }
            TuiEvent::End => {
                self.cursor = self.char_count();
                None
            }
            TuiEvent::Submit => Some(SearchBarEvent::Activate),
            _ => None,
        }
    }
}
