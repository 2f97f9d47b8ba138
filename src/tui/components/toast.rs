//! # Toast Component
//!
//! One-line transient notification at the bottom of the screen.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::{Toast, ToastKind};
use crate::tui::component::Component;

pub struct ToastLine<'a> {
    pub toast: Option<&'a Toast>,
}

fn style_for(kind: ToastKind) -> (Style, &'static str) {
    match kind {
        ToastKind::Success => (Style::default().fg(Color::Green), "✓"),
        ToastKind::Error => (Style::default().fg(Color::Red), "✗"),
    }
}

impl Component for ToastLine<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let Some(toast) = self.toast else {
            return;
        };
        let (style, icon) = style_for(toast.kind);
        let line = Line::from(vec![
            Span::styled(icon, style.add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(toast.text.as_str(), style),
        ]);
        frame.render_widget(Paragraph::new(line).centered(), area);
    }
}
