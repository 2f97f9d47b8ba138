//! # Loading Component
//!
//! Indeterminate spinner shown in place of the results while a search runs.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct Loading {
    frame_index: usize,
}

impl Loading {
    pub fn new(frame_index: usize) -> Self {
        Self { frame_index }
    }

    fn glyph(&self) -> &'static str {
        SPINNER[self.frame_index % SPINNER.len()]
    }
}

impl Component for Loading {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [center] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(area);

        let line = Line::from(vec![
            Span::styled(
                self.glyph(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Loading", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line).centered(), center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_wraps_around() {
        assert_eq!(Loading::new(0).glyph(), Loading::new(SPINNER.len()).glyph());
        assert_ne!(Loading::new(0).glyph(), Loading::new(1).glyph());
    }
}
