// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Platform permission providers

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::PermissionState;

/// Failure to query the platform capability
#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("camera permission query failed: {0}")]
    Query(String),

    #[error("camera permission query failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Platform capability check behind the permission gate
///
/// Implementations may block on a user prompt. Returning an error or
/// `PermissionState::Unknown` is treated as denied by the gate.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Ask the platform for camera access
    async fn request(&self) -> Result<PermissionState, PermissionError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Grants camera access iff the camera source can be read
///
/// Used by the CLI, where the "camera" is a file or a spool directory.
pub struct SourcePermission {
    source: PathBuf,
}

impl SourcePermission {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[async_trait]
impl PermissionProvider for SourcePermission {
    async fn request(&self) -> Result<PermissionState, PermissionError> {
        let metadata = match tokio::fs::metadata(&self.source).await {
            Ok(metadata) => metadata,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
                debug!("Camera source {} not accessible: {}", self.source.display(), e);
                return Ok(PermissionState::Denied);
            }
            Err(e) => return Err(e.into()),
        };

        let readable = if metadata.is_dir() {
            tokio::fs::read_dir(&self.source).await.map(|_| ())
        } else {
            tokio::fs::File::open(&self.source).await.map(|_| ())
        };

        match readable {
            Ok(()) => Ok(PermissionState::Granted),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => Ok(PermissionState::Denied),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &'static str {
        "source"
    }
}
