//! Streaming image downloader.
//!
//! The body is streamed into a uniquely named `<name>.XXXXXX.part` file and
//! persisted under the final name once complete. An interrupted download
//! never leaves a truncated image under the final name, and two saves of
//! the same target never write through the same file.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use log::debug;
use tokio::io::AsyncWriteExt;

use super::{DownloadTarget, StorageError};

/// Bytes received so far, and the expected total when the server sent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub received: u64,
    pub total: Option<u64>,
}

impl Progress {
    /// Completion in percent, if the total is known.
    pub fn percent(&self) -> Option<u8> {
        match self.total {
            Some(0) | None => None,
            Some(total) => Some((self.received.min(total) * 100 / total) as u8),
        }
    }
}

pub struct Downloader {
    directory: PathBuf,
    client: reqwest::Client,
}

impl Downloader {
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            client: reqwest::Client::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Fetches `target` into the downloads directory and returns the saved path.
    pub async fn fetch(
        &self,
        target: &DownloadTarget,
        progress: &(dyn Fn(Progress) + Send + Sync),
    ) -> Result<PathBuf, StorageError> {
        let response = self
            .client
            .get(&target.url)
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Http {
                status: status.as_u16(),
            });
        }

        tokio::fs::create_dir_all(&self.directory).await?;
        let final_path = self.directory.join(&target.file_name);

        // Removed on drop unless persisted.
        let part = tempfile::Builder::new()
            .prefix(&format!("{}.", target.file_name))
            .suffix(".part")
            .tempfile_in(&self.directory)?;
        let (file, part_path) = part.into_parts();
        debug!("Streaming {} into {}", target.url, part_path.display());

        stream_to_file(response, tokio::fs::File::from_std(file), progress).await?;

        part_path
            .persist(&final_path)
            .map_err(|e| StorageError::Io(e.error))?;
        Ok(final_path)
    }
}

async fn stream_to_file(
    response: reqwest::Response,
    mut file: tokio::fs::File,
    progress: &(dyn Fn(Progress) + Send + Sync),
) -> Result<(), StorageError> {
    let total = response.content_length();
    let mut stream = response.bytes_stream();
    let mut received = 0u64;

    progress(Progress { received, total });
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| StorageError::Network(e.to_string()))?;
        file.write_all(&chunk).await?;
        received += chunk.len() as u64;
        progress(Progress { received, total });
    }
    file.flush().await?;

    debug!("Streamed {} bytes", received);
    Ok(())
}
