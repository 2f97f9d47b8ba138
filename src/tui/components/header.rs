//! # Header Component
//!
//! Top line: the "CINEMA" logo on the left, status and key hints on the right.
//! Purely presentational; all data arrives as props.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub const LOGO: &str = "CINEMA";
const HINTS: &str = "^O map · ^C quit";

pub struct Header {
    pub status_message: String,
}

impl Header {
    pub fn new(status_message: String) -> Self {
        Self { status_message }
    }

    fn right_text(&self) -> String {
        if self.status_message.is_empty() {
            HINTS.to_string()
        } else {
            format!("{} | {}", self.status_message, HINTS)
        }
    }
}

impl Component for Header {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [logo_area, status_area] =
            Layout::horizontal([Constraint::Length(LOGO.len() as u16), Constraint::Min(0)])
                .areas(area);

        frame.render_widget(
            Span::styled(
                LOGO,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            logo_area,
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                self.right_text(),
                Style::default().fg(Color::DarkGray),
            )))
            .right_aligned(),
            status_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_text() {
        assert_eq!(Header::new(String::new()).right_text(), HINTS);
        assert_eq!(
            Header::new("3 results".to_string()).right_text(),
            format!("3 results | {HINTS}")
        );
    }
}
