//! # Storage Access
//!
//! Saving an image to the downloads directory is a one-shot side flow whose
//! shape depends on the platform:
//!
//! ```text
//!   Unrestricted:  save() ──────────────────────────────► download
//!   Permissioned:  save() ──► request permission ─┬─ granted ─► download
//!                                                 ├─ denied ──► Denied
//!                                                 └─ error ───► RequestFailed
//! ```
//!
//! Both shapes sit behind [`StorageAccess`]; the event loop picks one at
//! startup via [`build_storage`] and never branches on the platform again.

pub mod download;
pub mod permission;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};

use crate::Platform;
use crate::search::Movie;

pub use download::{Downloader, Progress};
pub use permission::{
    DirectoryPermission, PermissionPrompt, PermissionRequester, PermissionStatus, PromptSender,
    UserPrompt,
};

/// Extensions kept from the source URL; anything else is saved as `.jpg`.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Network(String),
    Http { status: u16 },
    /// The user-facing prompt went away before an answer arrived.
    PromptClosed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "storage I/O error: {e}"),
            StorageError::Network(msg) => write!(f, "network error: {msg}"),
            StorageError::Http { status } => write!(f, "download failed with HTTP {status}"),
            StorageError::PromptClosed => write!(f, "permission prompt closed without an answer"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// What to fetch and the file name to store it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub file_name: String,
}

impl DownloadTarget {
    /// Targets the movie's own poster, or `fallback_url` when it has none.
    pub fn for_movie(movie: &Movie, fallback_url: &str) -> Self {
        let url = movie.poster_url().unwrap_or(fallback_url).to_string();
        let stem = sanitize_stem(&movie.imdb_id);
        let file_name = format!("{}.{}", stem, url_extension(&url));
        Self { url, file_name }
    }
}

fn sanitize_stem(id: &str) -> String {
    let stem: String = id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if stem.is_empty() {
        "image".to_string()
    } else {
        stem
    }
}

fn url_extension(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or("");
    let last = path.rsplit('/').next().unwrap_or("");
    let ext = last.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    ext.and_then(|ext| IMAGE_EXTENSIONS.iter().copied().find(|known| *known == ext))
        .unwrap_or("jpg")
}

/// Result of one storage flow. Never an `Err`: every branch is reported.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageOutcome {
    Downloaded(PathBuf),
    Denied,
    RequestFailed(String),
    DownloadFailed(String),
}

#[async_trait]
pub trait StorageAccess: Send + Sync {
    /// Returns the name of the access strategy.
    fn name(&self) -> &str;

    /// Runs the full flow for `target`, reporting byte progress as it streams.
    async fn save(
        &self,
        target: &DownloadTarget,
        progress: &(dyn Fn(Progress) + Send + Sync),
    ) -> StorageOutcome;
}

async fn download(
    downloader: &Downloader,
    target: &DownloadTarget,
    progress: &(dyn Fn(Progress) + Send + Sync),
) -> StorageOutcome {
    match downloader.fetch(target, progress).await {
        Ok(path) => {
            info!("The file saved to {}", path.display());
            StorageOutcome::Downloaded(path)
        }
        Err(e) => {
            warn!("Download of {} failed: {}", target.url, e);
            StorageOutcome::DownloadFailed(e.to_string())
        }
    }
}

/// Downloads straight away.
pub struct DirectAccess {
    downloader: Downloader,
}

impl DirectAccess {
    pub fn new(downloader: Downloader) -> Self {
        Self { downloader }
    }
}

#[async_trait]
impl StorageAccess for DirectAccess {
    fn name(&self) -> &str {
        "direct"
    }

    async fn save(
        &self,
        target: &DownloadTarget,
        progress: &(dyn Fn(Progress) + Send + Sync),
    ) -> StorageOutcome {
        download(&self.downloader, target, progress).await
    }
}

/// Requests permission first and downloads only when it is granted.
pub struct GatedAccess<P> {
    permission: P,
    downloader: Downloader,
}

impl<P: PermissionRequester> GatedAccess<P> {
    pub fn new(permission: P, downloader: Downloader) -> Self {
        Self {
            permission,
            downloader,
        }
    }
}

#[async_trait]
impl<P: PermissionRequester> StorageAccess for GatedAccess<P> {
    fn name(&self) -> &str {
        "gated"
    }

    async fn save(
        &self,
        target: &DownloadTarget,
        progress: &(dyn Fn(Progress) + Send + Sync),
    ) -> StorageOutcome {
        match self.permission.request().await {
            Ok(PermissionStatus::Granted) => download(&self.downloader, target, progress).await,
            Ok(PermissionStatus::Denied) => {
                info!("Storage permission denied");
                StorageOutcome::Denied
            }
            Err(e) => {
                warn!("Storage permission request failed: {}", e);
                StorageOutcome::RequestFailed(e.to_string())
            }
        }
    }
}

/// Builds the storage strategy for `platform`, saving into `directory`.
///
/// With `prompts`, a permissioned platform asks the user before checking the
/// directory; without it (headless use) only the directory check decides.
pub fn build_storage(
    platform: Platform,
    directory: PathBuf,
    prompts: Option<PromptSender>,
) -> Arc<dyn StorageAccess> {
    let downloader = Downloader::new(directory.clone());
    let writable = DirectoryPermission::new(directory);
    match (platform, prompts) {
        (Platform::Unrestricted, _) => Arc::new(DirectAccess::new(downloader)),
        (Platform::Permissioned, Some(prompts)) => {
            Arc::new(GatedAccess::new(UserPrompt::new(prompts, writable), downloader))
        }
        (Platform::Permissioned, None) => Arc::new(GatedAccess::new(writable, downloader)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedPermission(Option<PermissionStatus>);

    #[async_trait]
    impl PermissionRequester for FixedPermission {
        async fn request(&self) -> Result<PermissionStatus, StorageError> {
            self.0.ok_or_else(|| {
                StorageError::Io(std::io::Error::other("permission service unavailable"))
            })
        }
    }

    fn movie(poster: &str) -> Movie {
        Movie {
            title: "The Lion King".to_string(),
            year: "1994".to_string(),
            imdb_id: "tt0110357".to_string(),
            kind: "movie".to_string(),
            poster: poster.to_string(),
        }
    }

    fn unreachable_downloader() -> Downloader {
        Downloader::new(std::env::temp_dir().join("cinema-never-written"))
    }

    #[test]
    fn test_target_uses_movie_poster() {
        let target = DownloadTarget::for_movie(
            &movie("https://m.media-amazon.com/images/M/lion.PNG?size=300"),
            "https://example.com/fallback.jpg",
        );
        assert_eq!(target.url, "https://m.media-amazon.com/images/M/lion.PNG?size=300");
        assert_eq!(target.file_name, "tt0110357.png");
    }

    #[test]
    fn test_target_falls_back_when_poster_missing() {
        let target = DownloadTarget::for_movie(&movie("N/A"), "https://example.com/fallback.jpg");
        assert_eq!(target.url, "https://example.com/fallback.jpg");
        assert_eq!(target.file_name, "tt0110357.jpg");
    }

    #[test]
    fn test_target_unknown_extension_defaults_to_jpg() {
        let target = DownloadTarget::for_movie(&movie("https://example.com/poster"), "unused");
        assert_eq!(target.file_name, "tt0110357.jpg");
    }

    #[test]
    fn test_sanitize_stem_strips_path_characters() {
        assert_eq!(sanitize_stem("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_stem("///"), "image");
    }

    #[tokio::test]
    async fn test_gated_denied_skips_download() {
        let calls = AtomicUsize::new(0);
        let access = GatedAccess::new(
            FixedPermission(Some(PermissionStatus::Denied)),
            unreachable_downloader(),
        );
        let target = DownloadTarget::for_movie(&movie("http://127.0.0.1:9/x.jpg"), "unused");
        let outcome = access
            .save(&target, &|_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        assert_eq!(outcome, StorageOutcome::Denied);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_gated_request_error_is_reported() {
        let access = GatedAccess::new(FixedPermission(None), unreachable_downloader());
        let target = DownloadTarget::for_movie(&movie("http://127.0.0.1:9/x.jpg"), "unused");
        let outcome = access.save(&target, &|_| {}).await;
        assert!(matches!(outcome, StorageOutcome::RequestFailed(msg) if msg.contains("unavailable")));
    }

    #[test]
    fn test_build_storage_picks_strategy() {
        let dir = std::env::temp_dir();
        let (prompts, _answers) = tokio::sync::mpsc::unbounded_channel();
        assert_eq!(build_storage(Platform::Unrestricted, dir.clone(), None).name(), "direct");
        assert_eq!(build_storage(Platform::Permissioned, dir.clone(), None).name(), "gated");
        assert_eq!(
            build_storage(Platform::Permissioned, dir, Some(prompts)).name(),
            "gated"
        );
    }

    #[tokio::test]
    async fn test_gated_prompt_declined_skips_download() {
        let (prompts, mut asked) = tokio::sync::mpsc::unbounded_channel();
        let dir = tempfile::tempdir().unwrap();
        let storage = build_storage(
            Platform::Permissioned,
            dir.path().join("Downloads"),
            Some(prompts),
        );
        tokio::spawn(async move {
            if let Some(prompt) = asked.recv().await {
                prompt.answer(false);
            }
        });

        let target = DownloadTarget::for_movie(&movie("http://127.0.0.1:9/x.jpg"), "unused");
        let outcome = storage.save(&target, &|_: Progress| {}).await;
        assert_eq!(outcome, StorageOutcome::Denied);
        assert!(!dir.path().join("Downloads").exists());
    }
}
