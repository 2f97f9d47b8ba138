//! # Map Screen
//!
//! Secondary screen reached from the header. It takes no parameters from
//! the search screen; only a placeholder is drawn in the terminal.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::Component;

pub struct MapScreen;

impl Component for MapScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .title("Map");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [center] = Layout::vertical([Constraint::Length(2)])
            .flex(Flex::Center)
            .areas(inner);
        let text = Paragraph::new(vec![
            Line::from("Maps are not available in the terminal."),
            Line::from("[Esc] back to search").style(Style::default().fg(Color::DarkGray)),
        ])
        .centered();
        frame.render_widget(text, center);
    }
}
