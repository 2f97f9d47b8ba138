//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the screen,
//! translates keyboard and mouse events into `core::Action` values, and
//! carries out the `Effect`s that `update()` returns.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! One loop on the main task owns the `App`. Searches and downloads run as
//! tokio tasks and report back through an `mpsc` channel of `Action`s, so
//! every state change still goes through `update()` on this loop.
//!
//! - **Animating** (loading, download in progress): redraws every ~80ms.
//! - **Idle**: sleeps up to 250ms between polls so toast expiry still ticks.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, Route};
use crate::search::{MovieSearch, OmdbClient};
use crate::storage::{DownloadTarget, PermissionPrompt, Progress, StorageAccess, build_storage};
use crate::tui::component::EventHandler;
use crate::tui::components::{GridEvent, MovieGridState, SearchBar, SearchBarEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::Hit;

/// Which control receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Typing edits the query. The terminal's "on-screen keyboard".
    SearchBar,
    /// Arrow keys move the selection; Enter downloads.
    Grid,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub search_bar: SearchBar,
    pub grid: MovieGridState,
    pub focus: Focus,
    /// Permission question shown in the rationale dialog, awaiting OK/Cancel.
    pub pending_prompt: Option<PermissionPrompt>,
}

impl TuiState {
    pub fn new(grid_item_width: u16) -> Self {
        Self {
            search_bar: SearchBar::new(),
            grid: MovieGridState::new(grid_item_width),
            focus: Focus::SearchBar, // User expects to type immediately
            pending_prompt: None,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock, // Non-blinking: continuous redraws reset the blink timer
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Build the search client from the resolved config.
pub fn build_search(config: &ResolvedConfig) -> Arc<dyn MovieSearch> {
    let api_key = config.omdb_api_key.clone().unwrap_or_else(|| {
        warn!("No OMDb API key configured (config file or OMDB_API_KEY env var)");
        String::new()
    });
    Arc::new(OmdbClient::new(api_key, Some(config.omdb_base_url.clone())))
}

pub fn run(config: ResolvedConfig, initial_query: Option<String>) -> std::io::Result<()> {
    let search = build_search(&config);
    // Permission questions from download tasks, answered through a dialog
    let (prompt_tx, mut prompt_rx) = tokio::sync::mpsc::unbounded_channel();
    let storage = build_storage(
        config.platform,
        config.download_dir.clone(),
        Some(prompt_tx),
    );
    info!(
        "Search backend: {}, storage: {} ({})",
        search.name(),
        storage.name(),
        config.download_dir.display()
    );

    let mut app = App::from_config(search, storage, &config);
    if let Some(query) = initial_query {
        app = app.with_query(query);
    }
    let mut tui = TuiState::new(config.grid_item_width);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    dispatch(&mut app, &mut tui, Action::Mount, &tx);

    'event_loop: loop {
        update(&mut app, Action::Tick(Instant::now()));

        let animating = app.is_loading || app.download.is_some();
        if animating || app.toast.is_some() {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(250)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let frame_area = terminal.get_frame().area();
            if handle_event(&mut app, &mut tui, event, frame_area, &tx) {
                break 'event_loop;
            }
        }

        // Handle background task actions (search results, download progress)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, &mut tui, action, &tx) {
                break 'event_loop;
            }
        }

        // One permission question at a time; the rest wait in the channel
        if tui.pending_prompt.is_none()
            && let Ok(prompt) = prompt_rx.try_recv()
        {
            needs_redraw = true;
            show_prompt(&mut app, &mut tui, prompt, &tx);
        }
    }

    ratatui::restore();
    Ok(())
}

/// Routes one terminal event. Returns true when the app should quit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    event: TuiEvent,
    frame_area: ratatui::layout::Rect,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match event {
        TuiEvent::Resize => return false,
        TuiEvent::ForceQuit => return dispatch(app, tui, Action::Quit, tx),
        _ => {}
    }

    // A pending permission question sits on top and is answered first
    if tui.pending_prompt.is_some() {
        return match event {
            TuiEvent::Submit | TuiEvent::InputChar('y' | 'Y') => answer_prompt(app, tui, true, tx),
            TuiEvent::Escape | TuiEvent::InputChar('n' | 'N') => answer_prompt(app, tui, false, tx),
            _ => false,
        };
    }

    // A blocking alert swallows everything until dismissed
    if app.alert.is_some() {
        if matches!(event, TuiEvent::Submit | TuiEvent::Escape) {
            return dispatch(app, tui, Action::DismissAlert, tx);
        }
        return false;
    }

    if app.route == Route::Map {
        if matches!(event, TuiEvent::Escape | TuiEvent::OpenMap) {
            return dispatch(app, tui, Action::CloseMap, tx);
        }
        return false;
    }

    match event {
        TuiEvent::OpenMap => return dispatch(app, tui, Action::OpenMap, tx),
        TuiEvent::MouseClick(x, y) => {
            return match ui::hit_test(x, y, frame_area, tui) {
                Some(Hit::SearchButton) => activate_search_button(app, tui, tx),
                Some(Hit::SearchField) => {
                    tui.focus = Focus::SearchBar;
                    false
                }
                Some(Hit::Cell(index)) => {
                    tui.focus = Focus::Grid;
                    tui.grid.selected = Some(index);
                    dispatch(app, tui, Action::SelectMovie(index), tx)
                }
                None => false,
            };
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.grid.handle_event(&event);
            return false;
        }
        _ => {}
    }

    match tui.focus {
        Focus::SearchBar => match event {
            TuiEvent::Tab | TuiEvent::Escape | TuiEvent::CursorDown => {
                tui.focus = Focus::Grid;
                false
            }
            _ => match tui.search_bar.handle_event(&event) {
                Some(SearchBarEvent::Edited(text)) => dispatch(app, tui, Action::EditQuery(text), tx),
                Some(SearchBarEvent::Activate) => activate_search_button(app, tui, tx),
                None => false,
            },
        },
        Focus::Grid => match event {
            TuiEvent::Tab | TuiEvent::Escape => {
                tui.focus = Focus::SearchBar;
                false
            }
            // Typing auto-switches to the search bar and forwards the event
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) | TuiEvent::Backspace => {
                tui.focus = Focus::SearchBar;
                match tui.search_bar.handle_event(&event) {
                    Some(SearchBarEvent::Edited(text)) => {
                        dispatch(app, tui, Action::EditQuery(text), tx)
                    }
                    _ => false,
                }
            }
            _ => match tui.grid.handle_event(&event) {
                Some(GridEvent::Select(index)) => dispatch(app, tui, Action::SelectMovie(index), tx),
                Some(GridEvent::LeaveTop) => {
                    tui.focus = Focus::SearchBar;
                    false
                }
                None => false,
            },
        },
    }
}

fn show_prompt(
    app: &mut App,
    tui: &mut TuiState,
    prompt: PermissionPrompt,
    tx: &mpsc::Sender<Action>,
) {
    let action = Action::ShowRationale {
        title: prompt.title.clone(),
        message: prompt.message.clone(),
    };
    tui.pending_prompt = Some(prompt);
    dispatch(app, tui, action, tx);
}

fn answer_prompt(
    app: &mut App,
    tui: &mut TuiState,
    granted: bool,
    tx: &mpsc::Sender<Action>,
) -> bool {
    if let Some(prompt) = tui.pending_prompt.take() {
        prompt.answer(granted);
    }
    dispatch(app, tui, Action::AnswerRationale(granted), tx)
}

/// The search bar's button. A search also dismisses the keyboard (focus moves to the grid).
fn activate_search_button(app: &mut App, tui: &mut TuiState, tx: &mpsc::Sender<Action>) -> bool {
    let submitting = !app.show_clear;
    let quit = dispatch(app, tui, Action::ActivateSearchButton, tx);
    if submitting {
        tui.focus = Focus::Grid;
    }
    quit
}

/// Runs `action` through `update()` and performs the resulting effect.
/// Returns true when the app should quit.
fn dispatch(app: &mut App, tui: &mut TuiState, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    let effect = update(app, action);
    tui.search_bar.sync(&app.query_text);
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::SpawnSearch { request_id, query } => {
            tui.grid.reset();
            spawn_search(app.search.clone(), request_id, query, tx.clone());
            false
        }
        Effect::SpawnDownload(target) => {
            spawn_download(app.storage.clone(), target, tx.clone());
            false
        }
    }
}

fn spawn_search(
    search: Arc<dyn MovieSearch>,
    request_id: u64,
    query: String,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning search #{} ({})", request_id, search.name());
    tokio::spawn(async move {
        let outcome = search.search(&query).await;
        if let Err(e) = &outcome {
            info!("Search #{} error: {}", request_id, e);
        }
        if tx
            .send(Action::SearchCompleted {
                request_id,
                outcome,
                at: Instant::now(),
            })
            .is_err()
        {
            warn!("Failed to send search #{} result: receiver dropped", request_id);
        }
    });
}

fn spawn_download(storage: Arc<dyn StorageAccess>, target: DownloadTarget, tx: mpsc::Sender<Action>) {
    info!(
        "Spawning download of {} as {} ({})",
        target.url,
        target.file_name,
        storage.name()
    );
    tokio::spawn(async move {
        let progress_tx = tx.clone();
        let report = move |progress: Progress| {
            // Progress is best-effort; the final outcome is what matters.
            let _ = progress_tx.send(Action::DownloadProgress(progress));
        };
        let outcome = storage.save(&target, &report).await;
        if tx.send(Action::StorageFinished(outcome)).is_err() {
            warn!("Failed to send download outcome: receiver dropped");
        }
    });
}
