// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Capture pipeline error taxonomy and user advisories

use serde::Serialize;
use thiserror::Error;

use super::camera::CameraError;
use crate::recognition::GENERIC_FAILURE;
use crate::vision::NormalizeError;

/// Errors raised inside a capture cycle
///
/// Only `PermissionDenied` disables capture for the session; the rest
/// abort the current cycle and leave the camera usable.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error(transparent)]
    CameraUnavailable(#[from] CameraError),

    #[error("failed to prepare image: {0}")]
    Normalization(#[from] NormalizeError),

    #[error("{0}")]
    Transport(String),
}

impl CaptureError {
    /// Advisory shown to the user for this error
    pub fn advisory(&self) -> Advisory {
        match self {
            CaptureError::PermissionDenied => Advisory::permission_required(),
            CaptureError::CameraUnavailable(CameraError::Unavailable(_)) => {
                Advisory::camera_unavailable()
            }
            CaptureError::CameraUnavailable(_) | CaptureError::Normalization(_) => {
                Advisory::capture_failed()
            }
            CaptureError::Transport(reason) => Advisory::recognition_failed(reason),
        }
    }
}

/// One-shot alert surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub title: String,
    pub message: String,
}

impl Advisory {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn permission_required() -> Self {
        Self::new(
            "Permission Required",
            "Camera access is needed to capture food images. Please enable it in your device settings.",
        )
    }

    pub fn camera_unavailable() -> Self {
        Self::new("Camera Error", "Camera is not available.")
    }

    pub fn capture_failed() -> Self {
        Self::new("Error", "An error occurred while capturing the image.")
    }

    pub fn not_recognized() -> Self {
        Self::new("Error", "Food not recognized. Please try again.")
    }

    pub fn recognition_failed(reason: &str) -> Self {
        let reason = if reason.trim().is_empty() {
            GENERIC_FAILURE
        } else {
            reason
        };
        Self::new("Error", reason)
    }
}
