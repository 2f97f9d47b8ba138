use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::core::state::{App, ScreenView};
use crate::tui::component::Component;
use crate::tui::components::alert;
use crate::tui::components::search_bar::{self, SearchBar};
use crate::tui::components::{AlertDialog, Header, Loading, MapScreen, MovieGrid, ToastLine};
use crate::tui::{Focus, TuiState};

pub const EMPTY_TEXT: &str = "No Movies";

/// Areas of the screen, shared by drawing and hit testing.
pub struct ScreenLayout {
    pub header: Rect,
    pub search: Rect,
    pub main: Rect,
    pub toast: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    use Constraint::{Length, Min};
    let [header, _gap, search, main, toast] = Layout::vertical([
        Length(1),
        Length(1),
        Length(search_bar::HEIGHT),
        Min(0),
        Length(1),
    ])
    .areas(area);
    ScreenLayout {
        header,
        search,
        main,
        toast,
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let layout = screen_layout(frame.area());

    Header::new(app.status_message()).render(frame, layout.header);

    match app.view() {
        ScreenView::Map => {
            let map_area = layout.search.union(layout.main);
            MapScreen.render(frame, map_area);
        }
        view => {
            tui.search_bar.show_clear = app.show_clear;
            tui.search_bar.focused = tui.focus == Focus::SearchBar;
            tui.search_bar.render(frame, layout.search);

            match view {
                ScreenView::Loading => Loading::new(spinner_frame).render(frame, layout.main),
                ScreenView::Grid(_) => {
                    let mut grid = MovieGrid {
                        state: &mut tui.grid,
                        movies: app.visible_movies(),
                        focused: tui.focus == Focus::Grid,
                    };
                    grid.render(frame, layout.main);
                }
                _ => draw_empty(frame, layout.main),
            }
        }
    }

    ToastLine {
        toast: app.toast.as_ref(),
    }
    .render(frame, layout.toast);

    if let Some(shown) = &app.alert {
        AlertDialog {
            alert: shown,
            buttons: alert::ACKNOWLEDGE,
        }
        .render(frame, frame.area());
    }
    // A pending question takes input first, so it sits on top.
    if let Some(rationale) = &app.rationale {
        AlertDialog {
            alert: rationale,
            buttons: alert::CONFIRM,
        }
        .render(frame, frame.area());
    }
}

fn draw_empty(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(EMPTY_TEXT).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, area);
}

/// What a mouse click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    SearchButton,
    SearchField,
    Cell(usize),
}

/// Hit test: given a screen position, find the control (if any) under it.
pub fn hit_test(x: u16, y: u16, frame_area: Rect, tui: &TuiState) -> Option<Hit> {
    let layout = screen_layout(frame_area);
    let pos = Position::new(x, y);

    if layout.search.contains(pos) {
        if SearchBar::button_area(layout.search).contains(pos) {
            return Some(Hit::SearchButton);
        }
        return Some(Hit::SearchField);
    }

    tui.grid.hit_test(x, y, layout.main).map(Hit::Cell)
}
