// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod capture;
pub mod cli;
pub mod config;
pub mod permission;
pub mod recognition;
pub mod version;
pub mod vision;

// Re-export main pipeline types
pub use capture::{
    Advisory, Camera, CameraError, CaptureController, CaptureError, CaptureSession, FileCamera,
    Phase, SessionEvent,
};
pub use config::ScanConfig;
pub use permission::{PermissionGate, PermissionProvider, PermissionState, SourcePermission};
pub use recognition::{Nutrient, RecognitionClient, RecognitionResult, Recognizer};
pub use vision::{normalize, CapturedImage, ImageNormalizer, NormalizeError, NormalizedPayload};
