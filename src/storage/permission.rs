//! Write-permission requests for the downloads directory.
//!
//! [`DirectoryPermission`] checks what the filesystem allows. [`UserPrompt`]
//! puts the rationale to the user first and checks the directory once they
//! agree:
//!
//! ```text
//!   request() ──► PermissionPrompt ──► event loop (dialog) ──► answer(bool)
//!        ▲                                                        │
//!        └──────────────────── oneshot ◄──────────────────────────┘
//! ```

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::{mpsc, oneshot};

use super::StorageError;

const MARKER_FILE: &str = ".cinema-write-check";

pub const RATIONALE_TITLE: &str = "Storage access permission";
pub const RATIONALE_MESSAGE: &str = "This app needs access to your storage to download Photos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[async_trait]
pub trait PermissionRequester: Send + Sync {
    /// Asks for write access. `Err` means the request itself could not be made.
    async fn request(&self) -> Result<PermissionStatus, StorageError>;
}

/// Grants access when the directory exists (or can be created) and accepts a write.
pub struct DirectoryPermission {
    directory: PathBuf,
}

impl DirectoryPermission {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }
}

fn is_denial(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem
    )
}

#[async_trait]
impl PermissionRequester for DirectoryPermission {
    async fn request(&self) -> Result<PermissionStatus, StorageError> {
        match tokio::fs::create_dir_all(&self.directory).await {
            Ok(()) => {}
            Err(e) if is_denial(&e) => return Ok(PermissionStatus::Denied),
            Err(e) => return Err(e.into()),
        }

        let marker = self.directory.join(MARKER_FILE);
        match tokio::fs::write(&marker, b"").await {
            Ok(()) => {
                let _ = tokio::fs::remove_file(&marker).await;
                debug!("Write access granted for {}", self.directory.display());
                Ok(PermissionStatus::Granted)
            }
            Err(e) if is_denial(&e) => Ok(PermissionStatus::Denied),
            Err(e) => Err(e.into()),
        }
    }
}

/// A question waiting for the user's answer.
#[derive(Debug)]
pub struct PermissionPrompt {
    pub title: String,
    pub message: String,
    reply: oneshot::Sender<bool>,
}

impl PermissionPrompt {
    /// Delivers the answer. Dropping the prompt unanswered fails the request.
    pub fn answer(self, granted: bool) {
        if self.reply.send(granted).is_err() {
            debug!("Permission answer arrived after the request was abandoned");
        }
    }
}

/// Channel the event loop listens on for prompts.
pub type PromptSender = mpsc::UnboundedSender<PermissionPrompt>;

/// Asks the user, then defers to `then` to confirm the grant.
pub struct UserPrompt<P> {
    prompts: PromptSender,
    then: P,
}

impl<P: PermissionRequester> UserPrompt<P> {
    pub fn new(prompts: PromptSender, then: P) -> Self {
        Self { prompts, then }
    }
}

#[async_trait]
impl<P: PermissionRequester> PermissionRequester for UserPrompt<P> {
    async fn request(&self) -> Result<PermissionStatus, StorageError> {
        let (reply, answer) = oneshot::channel();
        let prompt = PermissionPrompt {
            title: RATIONALE_TITLE.to_string(),
            message: RATIONALE_MESSAGE.to_string(),
            reply,
        };
        self.prompts
            .send(prompt)
            .map_err(|_| StorageError::PromptClosed)?;

        match answer.await {
            Ok(true) => self.then.request().await,
            Ok(false) => {
                info!("User declined storage access");
                Ok(PermissionStatus::Denied)
            }
            Err(_) => Err(StorageError::PromptClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_granted_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Downloads");
        let permission = DirectoryPermission::new(dir.clone());

        let status = permission.request().await.unwrap();

        assert_eq!(status, PermissionStatus::Granted);
        assert!(dir.is_dir());
        assert!(!dir.join(MARKER_FILE).exists());
    }

    #[tokio::test]
    async fn test_directory_under_a_file_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();
        let permission = DirectoryPermission::new(file.join("Downloads"));

        assert!(permission.request().await.is_err());
    }

    /// Answers every prompt with `granted` and records what was asked.
    fn answering(granted: bool) -> (PromptSender, tokio::task::JoinHandle<Vec<String>>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<PermissionPrompt>();
        let handle = tokio::spawn(async move {
            let mut asked = Vec::new();
            while let Some(prompt) = rx.recv().await {
                asked.push(prompt.message.clone());
                prompt.answer(granted);
            }
            asked
        });
        (tx, handle)
    }

    #[tokio::test]
    async fn test_user_prompt_granted_then_checks_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Downloads");
        let (tx, asked) = answering(true);
        let permission = UserPrompt::new(tx, DirectoryPermission::new(dir.clone()));

        assert_eq!(permission.request().await.unwrap(), PermissionStatus::Granted);
        assert!(dir.is_dir());

        drop(permission);
        assert_eq!(asked.await.unwrap(), vec![RATIONALE_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_user_prompt_declined_leaves_directory_alone() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Downloads");
        let (tx, _asked) = answering(false);
        let permission = UserPrompt::new(tx, DirectoryPermission::new(dir.clone()));

        assert_eq!(permission.request().await.unwrap(), PermissionStatus::Denied);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_user_prompt_dropped_unanswered_is_an_error() {
        let (tx, mut rx) = mpsc::unbounded_channel::<PermissionPrompt>();
        tokio::spawn(async move {
            // Drop the prompt without answering
            let _ = rx.recv().await;
        });
        let permission = UserPrompt::new(tx, DirectoryPermission::new(std::env::temp_dir()));

        assert!(matches!(
            permission.request().await,
            Err(StorageError::PromptClosed)
        ));
    }

    #[tokio::test]
    async fn test_user_prompt_without_listener_is_an_error() {
        let (tx, rx) = mpsc::unbounded_channel::<PermissionPrompt>();
        drop(rx);
        let permission = UserPrompt::new(tx, DirectoryPermission::new(std::env::temp_dir()));

        assert!(matches!(
            permission.request().await,
            Err(StorageError::PromptClosed)
        ));
    }

    #[test]
    fn test_is_denial() {
        assert!(is_denial(&std::io::Error::from(ErrorKind::PermissionDenied)));
        assert!(!is_denial(&std::io::Error::from(ErrorKind::NotFound)));
    }
}
