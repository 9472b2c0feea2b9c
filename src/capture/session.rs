// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Capture session state and its transition function
//!
//! The session is a plain value. Every change goes through
//! [`CaptureSession::apply`], which is pure: it only looks at the current
//! value and the event, so any UI binding can drive it.
//!
//! Phases:
//!
//! ```text
//! Idle ──toggle──▶ CameraOpen ──capture──▶ Capturing ──frame──▶ Normalizing
//!  ▲                 ▲    ▲                    │                    │
//!  │                 │    └──camera failure────┘                    │
//!  │                 └────────normalization failure─────────────────┤
//!  │                                                                ▼
//!  └──────────────────────any result─────────────────────────── Recognizing
//! ```

use serde::Serialize;
use tracing::debug;

use super::error::{Advisory, CaptureError};
use crate::permission::PermissionState;
use crate::recognition::RecognitionResult;
use crate::vision::CapturedImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    CameraOpen,
    Capturing,
    Normalizing,
    Recognizing,
}

/// Inputs to the session, in the order they arrive
#[derive(Debug)]
pub enum SessionEvent {
    /// Startup permission prompt answered
    PermissionResolved(PermissionState),
    /// User pressed the open/close camera toggle
    ToggleCamera,
    /// User pressed the capture trigger
    CaptureRequested,
    /// Camera could not produce a frame
    CaptureFailed(CaptureError),
    /// Camera produced a frame
    ImageCaptured(CapturedImage),
    /// Frame could not be normalized
    NormalizationFailed(CaptureError),
    /// Payload is ready and the request is about to be issued
    PayloadReady,
    /// The recognition request finished, in any way
    RecognitionCompleted(RecognitionResult),
    /// User acknowledged the current advisory
    AdvisoryDismissed,
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            SessionEvent::PermissionResolved(_) => "permission_resolved",
            SessionEvent::ToggleCamera => "toggle_camera",
            SessionEvent::CaptureRequested => "capture_requested",
            SessionEvent::CaptureFailed(_) => "capture_failed",
            SessionEvent::ImageCaptured(_) => "image_captured",
            SessionEvent::NormalizationFailed(_) => "normalization_failed",
            SessionEvent::PayloadReady => "payload_ready",
            SessionEvent::RecognitionCompleted(_) => "recognition_completed",
            SessionEvent::AdvisoryDismissed => "advisory_dismissed",
        }
    }
}

/// UI-facing state of the capture feature
///
/// Invariants:
/// - `in_flight` holds only while `phase == Recognizing`
/// - `result.is_some()` implies `!in_flight`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaptureSession {
    permission: PermissionState,
    camera_open: bool,
    image: Option<CapturedImage>,
    result: Option<RecognitionResult>,
    in_flight: bool,
    phase: Phase,
    advisory: Option<Advisory>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn camera_open(&self) -> bool {
        self.camera_open
    }

    /// Last captured frame (preview)
    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&RecognitionResult> {
        self.result.as_ref()
    }

    /// Busy indicator
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn advisory(&self) -> Option<&Advisory> {
        self.advisory.as_ref()
    }

    /// Whether a capture trigger would start a new cycle right now
    pub fn can_capture(&self) -> bool {
        self.permission.is_granted() && !self.in_flight && self.phase == Phase::CameraOpen
    }

    /// Apply one event and return the next session
    ///
    /// Events that do not fit the current phase leave the session untouched.
    pub fn apply(self, event: SessionEvent) -> Self {
        let name = event.name();
        let before = self.phase;
        let next = self.step(event);
        if next.phase != before {
            debug!("Session {}: {:?} -> {:?}", name, before, next.phase);
        }
        next
    }

    fn step(mut self, event: SessionEvent) -> Self {
        match event {
            SessionEvent::PermissionResolved(state) => {
                if self.permission != PermissionState::Unknown {
                    return self;
                }
                self.permission = match state {
                    PermissionState::Granted => PermissionState::Granted,
                    _ => PermissionState::Denied,
                };
                if self.permission == PermissionState::Denied {
                    self.camera_open = false;
                    self.phase = Phase::Idle;
                    self.advisory = Some(CaptureError::PermissionDenied.advisory());
                }
                self
            }

            SessionEvent::ToggleCamera => {
                if !self.permission.is_granted() {
                    return self;
                }
                match self.phase {
                    Phase::Idle => {
                        self.camera_open = true;
                        self.phase = Phase::CameraOpen;
                    }
                    Phase::CameraOpen => {
                        self.camera_open = false;
                        self.phase = Phase::Idle;
                        self.advisory = None;
                    }
                    // The request keeps running; only the view changes
                    Phase::Recognizing => self.camera_open = !self.camera_open,
                    Phase::Capturing | Phase::Normalizing => {}
                }
                self
            }

            SessionEvent::CaptureRequested => {
                if !self.can_capture() {
                    return self;
                }
                self.phase = Phase::Capturing;
                self.advisory = None;
                self
            }

            SessionEvent::CaptureFailed(error) => {
                if self.phase != Phase::Capturing {
                    return self;
                }
                self.phase = Phase::CameraOpen;
                self.advisory = Some(error.advisory());
                self
            }

            SessionEvent::ImageCaptured(image) => {
                if self.phase != Phase::Capturing {
                    return self;
                }
                self.image = Some(image);
                self.phase = Phase::Normalizing;
                self
            }

            SessionEvent::NormalizationFailed(error) => {
                if self.phase != Phase::Normalizing {
                    return self;
                }
                self.phase = Phase::CameraOpen;
                self.in_flight = false;
                self.advisory = Some(error.advisory());
                self
            }

            SessionEvent::PayloadReady => {
                if self.phase != Phase::Normalizing {
                    return self;
                }
                self.phase = Phase::Recognizing;
                self.in_flight = true;
                self.result = None;
                self
            }

            SessionEvent::RecognitionCompleted(result) => {
                if self.phase != Phase::Recognizing || !self.in_flight {
                    return self;
                }
                self.advisory = match &result {
                    RecognitionResult::Recognized { .. } => None,
                    RecognitionResult::Unrecognized => Some(Advisory::not_recognized()),
                    RecognitionResult::Failed { reason } => {
                        Some(CaptureError::Transport(reason.clone()).advisory())
                    }
                };
                self.result = Some(result);
                self.in_flight = false;
                self.camera_open = false;
                self.phase = Phase::Idle;
                self
            }

            SessionEvent::AdvisoryDismissed => {
                self.advisory = None;
                self
            }
        }
    }
}
