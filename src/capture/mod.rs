// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Capture-to-recognition pipeline
//!
//! One cycle: camera frame → normalized payload → recognition request →
//! typed result on the session. At most one cycle runs at a time.

pub mod camera;
pub mod controller;
pub mod error;
pub mod session;

pub use camera::{Camera, CameraError, FileCamera};
pub use controller::CaptureController;
pub use error::{Advisory, CaptureError};
pub use session::{CaptureSession, Phase, SessionEvent};
