// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Camera seam and a file-backed camera

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::debug;

use crate::vision::image_utils::{is_image_extension, probe_image_bytes, ImageError};
use crate::vision::CapturedImage;

/// Failure to acquire a frame
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera is not available: {0}")]
    Unavailable(String),

    #[error("failed to read frame: {0}")]
    Io(#[from] std::io::Error),

    #[error("camera produced an unreadable frame: {0}")]
    BadFrame(#[from] ImageError),
}

/// Produces one raw frame per call
#[async_trait]
pub trait Camera: Send + Sync {
    async fn capture(&self) -> Result<CapturedImage, CameraError>;

    /// Camera name for logging
    fn name(&self) -> &'static str;
}

/// Camera backed by the filesystem
///
/// A file source is captured as-is on every call. A directory source acts
/// as a spool: each capture takes the most recently modified image in it.
pub struct FileCamera {
    source: PathBuf,
}

impl FileCamera {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    async fn newest_image(dir: &Path) -> Result<PathBuf, CameraError> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut newest: Option<(SystemTime, PathBuf)> = None;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(is_image_extension)
                .unwrap_or(false);
            if !is_image {
                continue;
            }

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            let is_newer = match &newest {
                Some((current, current_path)) => {
                    modified > *current || (modified == *current && path > *current_path)
                }
                None => true,
            };
            if is_newer {
                newest = Some((modified, path));
            }
        }

        newest
            .map(|(_, path)| path)
            .ok_or_else(|| CameraError::Unavailable(format!("no image in {}", dir.display())))
    }
}

#[async_trait]
impl Camera for FileCamera {
    async fn capture(&self) -> Result<CapturedImage, CameraError> {
        let metadata = tokio::fs::metadata(&self.source).await.map_err(|e| {
            CameraError::Unavailable(format!("{}: {}", self.source.display(), e))
        })?;

        let path = if metadata.is_dir() {
            Self::newest_image(&self.source).await?
        } else {
            self.source.clone()
        };

        let data = tokio::fs::read(&path).await?;
        let info = probe_image_bytes(&data)?;
        debug!(
            "Captured {} ({}x{}, {} bytes)",
            path.display(),
            info.width,
            info.height,
            data.len()
        );

        Ok(CapturedImage::new(
            path.display().to_string(),
            data,
            info.width,
            info.height,
        ))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
