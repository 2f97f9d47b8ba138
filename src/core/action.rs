//! # Actions
//!
//! Everything that can happen on the search screen becomes an `Action`.
//! User presses Enter? That's `Action::ActivateSearchButton`.
//! OMDb responds? That's `Action::SearchCompleted { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns the `Effect` the adapter must perform. No side
//! effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Time enters only through actions (`Tick`, `SearchCompleted::at`), so the
//! loading hold is testable without sleeping.

use std::time::Instant;

use log::{debug, info, warn};

use crate::core::state::{Alert, App, Route, Toast, ToastKind};
use crate::search::{Movie, SearchError};
use crate::storage::{DownloadTarget, Progress, StorageOutcome};

pub const SEARCH_FAILED_TEXT: &str = "Movies search failed!";
pub const DOWNLOADED_TEXT: &str = "Downloaded";
pub const DOWNLOAD_FAILED_TEXT: &str = "Download failed";
pub const PERMISSION_ALERT_TITLE: &str = "Error";
pub const PERMISSION_ALERT_TEXT: &str = "Storage Permission Not Granted";

#[derive(Debug)]
pub enum Action {
    /// Screen shown for the first time.
    Mount,
    /// Search bar text replaced (one keystroke, paste, or deletion).
    EditQuery(String),
    SubmitSearch,
    ClearSearch,
    /// The search bar's single button: clear when the affordance is visible, else search.
    ActivateSearchButton,
    SearchCompleted {
        request_id: u64,
        outcome: Result<Vec<Movie>, SearchError>,
        at: Instant,
    },
    Tick(Instant),
    /// A grid cell was chosen (index into the current results).
    SelectMovie(usize),
    DownloadProgress(Progress),
    StorageFinished(StorageOutcome),
    DismissAlert,
    /// The storage layer asks the user before touching the downloads directory.
    ShowRationale { title: String, message: String },
    /// OK (`true`) or Cancel (`false`) on the rationale dialog.
    AnswerRationale(bool),
    OpenMap,
    CloseMap,
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    SpawnSearch { request_id: u64, query: String },
    SpawnDownload(DownloadTarget),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Mount => {
            let query = if app.query_text.is_empty() {
                app.settings.default_query.clone()
            } else {
                app.query_text.clone()
            };
            begin_search(app, query)
        }
        Action::EditQuery(text) => {
            app.query_text = text;
            app.show_clear = false;
            Effect::None
        }
        Action::SubmitSearch => {
            app.show_clear = true;
            let query = app.query_text.clone();
            begin_search(app, query)
        }
        Action::ClearSearch => {
            app.query_text.clear();
            app.show_clear = false;
            let query = app.settings.default_query.clone();
            begin_search(app, query)
        }
        Action::ActivateSearchButton => {
            if app.show_clear {
                update(app, Action::ClearSearch)
            } else {
                update(app, Action::SubmitSearch)
            }
        }
        Action::SearchCompleted {
            request_id,
            outcome,
            at,
        } => {
            if request_id != app.latest_request {
                debug!(
                    "Ignoring stale search #{} (latest is #{})",
                    request_id, app.latest_request
                );
                return Effect::None;
            }
            match outcome {
                Ok(movies) => {
                    info!("Search #{} applied: {} movies", request_id, movies.len());
                    app.results = Some(movies);
                }
                Err(e) => {
                    warn!("Search #{} failed: {}", request_id, e);
                    app.toast = Some(Toast::new(ToastKind::Error, SEARCH_FAILED_TEXT));
                }
            }
            app.loading_until = Some(at + app.settings.loading_hold);
            Effect::None
        }
        Action::Tick(now) => {
            if app.is_loading
                && let Some(until) = app.loading_until
                && now >= until
            {
                app.is_loading = false;
                app.loading_until = None;
            }
            let toast_expired = match app.toast.as_mut() {
                Some(toast) => match toast.expires_at {
                    None => {
                        toast.expires_at = Some(now + app.settings.toast_duration);
                        false
                    }
                    Some(expiry) => now >= expiry,
                },
                None => false,
            };
            if toast_expired {
                app.toast = None;
            }
            Effect::None
        }
        Action::SelectMovie(index) => {
            if app.is_loading || app.route != Route::Search {
                return Effect::None;
            }
            let Some(movie) = app.results.as_ref().and_then(|movies| movies.get(index)) else {
                return Effect::None;
            };
            let target = DownloadTarget::for_movie(movie, &app.settings.fallback_download_url);
            info!("Saving {:?} from {}", movie.title, target.url);
            app.active_downloads += 1;
            app.download = Some(Progress {
                received: 0,
                total: None,
            });
            Effect::SpawnDownload(target)
        }
        Action::DownloadProgress(progress) => {
            if app.active_downloads > 0 {
                app.download = Some(progress);
            }
            Effect::None
        }
        Action::StorageFinished(outcome) => {
            app.active_downloads = app.active_downloads.saturating_sub(1);
            if app.active_downloads == 0 {
                app.download = None;
            }
            match outcome {
                StorageOutcome::Downloaded(_) => {
                    app.toast = Some(Toast::new(ToastKind::Success, DOWNLOADED_TEXT));
                }
                StorageOutcome::Denied => {
                    app.alert = Some(Alert {
                        title: PERMISSION_ALERT_TITLE.to_string(),
                        message: PERMISSION_ALERT_TEXT.to_string(),
                    });
                }
                // Already logged by the storage layer; nothing to show.
                StorageOutcome::RequestFailed(_) => {}
                StorageOutcome::DownloadFailed(_) => {
                    app.toast = Some(Toast::new(ToastKind::Error, DOWNLOAD_FAILED_TEXT));
                }
            }
            Effect::None
        }
        Action::DismissAlert => {
            app.alert = None;
            Effect::None
        }
        Action::ShowRationale { title, message } => {
            app.rationale = Some(Alert { title, message });
            Effect::None
        }
        Action::AnswerRationale(granted) => {
            info!("Storage rationale answered: {}", if granted { "OK" } else { "Cancel" });
            app.rationale = None;
            Effect::None
        }
        Action::OpenMap => {
            app.route = Route::Map;
            Effect::None
        }
        Action::CloseMap => {
            app.route = Route::Search;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn begin_search(app: &mut App, query: String) -> Effect {
    app.latest_request += 1;
    app.is_loading = true;
    app.loading_until = None;
    info!("Search #{} issued: s={:?}", app.latest_request, query);
    Effect::SpawnSearch {
        request_id: app.latest_request,
        query,
    }
}
