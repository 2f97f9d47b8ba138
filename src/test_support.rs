//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::state::{App, ScreenSettings};
use crate::search::{Movie, MovieSearch, SearchError};
use crate::storage::{DownloadTarget, Progress, StorageAccess, StorageOutcome};

/// A search backend that never finds anything.
pub struct NoopSearch;

#[async_trait]
impl MovieSearch for NoopSearch {
    fn name(&self) -> &str {
        "noop"
    }

    async fn search(&self, _query: &str) -> Result<Vec<Movie>, SearchError> {
        Ok(Vec::new())
    }
}

/// A storage strategy that reports success without touching the disk.
pub struct NoopStorage;

#[async_trait]
impl StorageAccess for NoopStorage {
    fn name(&self) -> &str {
        "noop"
    }

    async fn save(
        &self,
        target: &DownloadTarget,
        _progress: &(dyn Fn(Progress) + Send + Sync),
    ) -> StorageOutcome {
        StorageOutcome::Downloaded(target.file_name.clone().into())
    }
}

/// Creates a test App with no-op collaborators and default settings.
pub fn test_app() -> App {
    App::new(
        Arc::new(NoopSearch),
        Arc::new(NoopStorage),
        ScreenSettings::default(),
    )
}

/// A movie with no poster, identified by `id`.
pub fn movie(id: &str) -> Movie {
    Movie {
        title: format!("Movie {id}"),
        year: "2000".to_string(),
        imdb_id: id.to_string(),
        kind: "movie".to_string(),
        poster: "N/A".to_string(),
    }
}
