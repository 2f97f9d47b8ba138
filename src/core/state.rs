//! # Application State
//!
//! Core state of the search screen. Domain logic only; presentation state
//! (focus, grid selection, scroll offsets) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── search: Arc<dyn MovieSearch>     // movie database client
//! ├── storage: Arc<dyn StorageAccess>  // platform storage strategy
//! ├── settings: ScreenSettings         // immutable, injected at startup
//! ├── route: Route                     // Search or Map
//! ├── query_text: String               // search bar contents
//! ├── show_clear: bool                 // clear affordance visible
//! ├── results: Option<Vec<Movie>>      // None until the first response
//! ├── is_loading: bool                 // loading view shown
//! ├── loading_until: Option<Instant>   // end of the loading hold
//! ├── latest_request: u64              // id of the newest search
//! ├── toast: Option<Toast>             // transient notification
//! ├── alert: Option<Alert>             // blocking notification
//! ├── download: Option<Progress>       // progress of the running download
//! └── active_downloads: usize          // downloads still in flight
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::config::{
    DEFAULT_FALLBACK_DOWNLOAD_URL, DEFAULT_LOADING_HOLD_MS, DEFAULT_QUERY, DEFAULT_TOAST_MS,
    ResolvedConfig,
};
use crate::search::{Movie, MovieSearch};
use crate::storage::{Progress, StorageAccess};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Search,
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A transient, non-blocking notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    /// Stamped on the first tick after the toast appears.
    pub expires_at: Option<Instant>,
}

impl Toast {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            expires_at: None,
        }
    }
}

/// A blocking notification; stays up until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// What the main area shows. A pure function of `App`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenView {
    Loading,
    Grid(usize),
    Empty,
    Map,
}

/// Screen behaviour taken from the resolved config.
#[derive(Debug, Clone)]
pub struct ScreenSettings {
    pub default_query: String,
    pub loading_hold: Duration,
    pub toast_duration: Duration,
    pub fallback_download_url: String,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            default_query: DEFAULT_QUERY.to_string(),
            loading_hold: Duration::from_millis(DEFAULT_LOADING_HOLD_MS),
            toast_duration: Duration::from_millis(DEFAULT_TOAST_MS),
            fallback_download_url: DEFAULT_FALLBACK_DOWNLOAD_URL.to_string(),
        }
    }
}

impl From<&ResolvedConfig> for ScreenSettings {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            default_query: config.default_query.clone(),
            loading_hold: config.loading_hold,
            toast_duration: config.toast_duration,
            fallback_download_url: config.fallback_download_url.clone(),
        }
    }
}

pub struct App {
    pub search: Arc<dyn MovieSearch>,
    pub storage: Arc<dyn StorageAccess>,
    pub settings: ScreenSettings,
    pub route: Route,
    pub query_text: String,
    pub show_clear: bool,
    pub results: Option<Vec<Movie>>,
    /// True from the start of a search until its loading hold has elapsed.
    pub is_loading: bool,
    pub loading_until: Option<Instant>,
    /// Monotonic id of the most recently issued search; older completions are dropped.
    pub latest_request: u64,
    pub toast: Option<Toast>,
    pub alert: Option<Alert>,
    /// Storage-access question awaiting an OK/Cancel answer.
    pub rationale: Option<Alert>,
    pub download: Option<Progress>,
    pub active_downloads: usize,
}

impl App {
    pub fn new(
        search: Arc<dyn MovieSearch>,
        storage: Arc<dyn StorageAccess>,
        settings: ScreenSettings,
    ) -> Self {
        Self {
            search,
            storage,
            settings,
            route: Route::Search,
            query_text: String::new(),
            show_clear: false,
            results: None,
            // The screen mounts straight into its first search.
            is_loading: true,
            loading_until: None,
            latest_request: 0,
            toast: None,
            alert: None,
            rationale: None,
            download: None,
            active_downloads: 0,
        }
    }

    pub fn from_config(
        search: Arc<dyn MovieSearch>,
        storage: Arc<dyn StorageAccess>,
        config: &ResolvedConfig,
    ) -> Self {
        Self::new(search, storage, ScreenSettings::from(config))
    }

    /// Seeds the search bar before mount (e.g. from `--query`).
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query_text = query.into();
        self
    }

    /// Rendering policy for the main area.
    pub fn view(&self) -> ScreenView {
        if self.route == Route::Map {
            return ScreenView::Map;
        }
        if self.is_loading {
            return ScreenView::Loading;
        }
        match self.results.as_deref() {
            Some(movies) if !movies.is_empty() => ScreenView::Grid(movies.len()),
            _ => ScreenView::Empty,
        }
    }

    /// Movies currently on screen (empty while loading).
    pub fn visible_movies(&self) -> &[Movie] {
        match self.view() {
            ScreenView::Grid(_) => self.results.as_deref().unwrap_or_default(),
            _ => &[],
        }
    }

    /// Short status text for the header line.
    pub fn status_message(&self) -> String {
        if let Some(progress) = self.download {
            return match progress.percent() {
                Some(pct) => format!("Downloading... {pct}%"),
                None => "Downloading...".to_string(),
            };
        }
        match (&self.results, self.is_loading) {
            (_, true) => "Searching...".to_string(),
            (Some(movies), false) if movies.len() == 1 => "1 result".to_string(),
            (Some(movies), false) => format!("{} results", movies.len()),
            (None, false) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{movie, test_app};

    use super::*;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(app.is_loading);
        assert!(!app.show_clear);
        assert!(app.results.is_none());
        assert_eq!(app.query_text, "");
        assert_eq!(app.route, Route::Search);
        assert_eq!(app.settings.default_query, "king");
    }

    #[test]
    fn test_view_loading_suppresses_results() {
        let mut app = test_app();
        app.results = Some(vec![movie("tt1")]);
        app.is_loading = true;
        assert_eq!(app.view(), ScreenView::Loading);
        assert!(app.visible_movies().is_empty());
    }

    #[test]
    fn test_view_grid_and_empty() {
        let mut app = test_app();
        app.is_loading = false;
        assert_eq!(app.view(), ScreenView::Empty);

        app.results = Some(Vec::new());
        assert_eq!(app.view(), ScreenView::Empty);

        app.results = Some(vec![movie("tt1"), movie("tt2"), movie("tt3")]);
        assert_eq!(app.view(), ScreenView::Grid(3));
        assert_eq!(app.visible_movies().len(), 3);
    }

    #[test]
    fn test_view_map_route_wins() {
        let mut app = test_app();
        app.route = Route::Map;
        assert_eq!(app.view(), ScreenView::Map);
    }

    #[test]
    fn test_status_message() {
        let mut app = test_app();
        assert_eq!(app.status_message(), "Searching...");
        app.is_loading = false;
        app.results = Some(vec![movie("tt1")]);
        assert_eq!(app.status_message(), "1 result");
        app.download = Some(Progress {
            received: 1,
            total: Some(4),
        });
        assert_eq!(app.status_message(), "Downloading... 25%");
    }
}
