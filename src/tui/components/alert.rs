//! # Alert Component
//!
//! Blocking modal drawn over everything else. The parent routes all input
//! to it until it is dismissed. Used both for plain alerts (`[Enter] OK`)
//! and for OK/Cancel questions.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

use crate::core::state::Alert;
use crate::tui::component::Component;

const WIDTH: u16 = 44;
const HEIGHT: u16 = 7;

pub const ACKNOWLEDGE: &str = "[Enter] OK";
pub const CONFIRM: &str = "[Enter] OK   [Esc] Cancel";

pub struct AlertDialog<'a> {
    pub alert: &'a Alert,
    /// Key hint line, e.g. [`ACKNOWLEDGE`] or [`CONFIRM`].
    pub buttons: &'static str,
}

/// Centered rect of at most `width` x `height` inside `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

impl Component for AlertDialog<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rect = centered(area, WIDTH, HEIGHT);
        frame.render_widget(Clear, rect);

        let lines = vec![
            Line::from(self.alert.message.as_str()),
            Line::default(),
            Line::from(Span::styled(
                self.buttons,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
        ];
        let dialog = Paragraph::new(lines)
            .centered()
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::Red))
                    .title(self.alert.title.as_str()),
            );
        frame.render_widget(dialog, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fits_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered(area, WIDTH, HEIGHT);
        assert_eq!(rect.width, WIDTH);
        assert_eq!(rect.height, HEIGHT);
        assert_eq!(rect.x, (80 - WIDTH) / 2);

        let tiny = centered(Rect::new(0, 0, 10, 3), WIDTH, HEIGHT);
        assert_eq!((tiny.width, tiny.height), (10, 3));
    }
}
