// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Capture controller: sequences capture, normalization and recognition

use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::camera::Camera;
use super::error::CaptureError;
use super::session::{CaptureSession, Phase, SessionEvent};
use crate::permission::{PermissionGate, PermissionState};
use crate::recognition::{RecognitionResult, Recognizer};
use crate::vision::{ImageNormalizer, NormalizeError};

/// Owns the capture session and drives it from user and device events
///
/// The recognition round trip runs on a spawned task whose handle stays
/// with the controller until its outcome has been applied, so a request
/// can never be orphaned while the session is marked in flight.
pub struct CaptureController {
    session: CaptureSession,
    gate: PermissionGate,
    camera: Arc<dyn Camera>,
    normalizer: ImageNormalizer,
    recognizer: Arc<dyn Recognizer>,
    pending: Option<JoinHandle<RecognitionResult>>,
    cancel: CancellationToken,
}

impl CaptureController {
    pub fn new(
        gate: PermissionGate,
        camera: Arc<dyn Camera>,
        normalizer: ImageNormalizer,
        recognizer: Arc<dyn Recognizer>,
    ) -> Self {
        Self {
            session: CaptureSession::new(),
            gate,
            camera,
            normalizer,
            recognizer,
            pending: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    /// Whether a recognition request is waiting to be applied
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply one event to the session
    pub fn dispatch(&mut self, event: SessionEvent) -> &CaptureSession {
        let session = std::mem::take(&mut self.session);
        self.session = session.apply(event);
        &self.session
    }

    /// Resolve camera permission; call once at startup
    pub async fn initialize(&mut self) -> PermissionState {
        let state = self.gate.request_permission().await;
        self.dispatch(SessionEvent::PermissionResolved(state));
        if !state.is_granted() {
            warn!("Camera permission denied; capture disabled for this session");
        }
        state
    }

    /// Open or close the camera view
    pub fn toggle_camera(&mut self) -> &CaptureSession {
        self.dispatch(SessionEvent::ToggleCamera)
    }

    pub fn dismiss_advisory(&mut self) -> &CaptureSession {
        self.dispatch(SessionEvent::AdvisoryDismissed)
    }

    /// Start a capture cycle
    ///
    /// Returns `true` when the cycle reached recognition; the request is
    /// then pending until [`complete`](Self::complete) applies it. Returns
    /// `false` when the trigger was ignored (camera closed, request already
    /// in flight) or when the cycle ended early with an advisory.
    pub async fn capture(&mut self) -> bool {
        if self.dispatch(SessionEvent::CaptureRequested).phase() != Phase::Capturing {
            debug!(
                "Capture trigger ignored (phase={:?}, in_flight={})",
                self.session.phase(),
                self.session.in_flight()
            );
            return false;
        }

        info!("📸 Capturing from {} camera", self.camera.name());
        let image = match self.camera.capture().await {
            Ok(image) => image,
            Err(e) => {
                warn!("Capture failed: {}", e);
                self.dispatch(SessionEvent::CaptureFailed(CaptureError::from(e)));
                return false;
            }
        };

        self.dispatch(SessionEvent::ImageCaptured(image.clone()));

        // Decode, resize and encode are CPU-bound
        let normalizer = self.normalizer;
        let normalized = tokio::task::spawn_blocking(move || normalizer.normalize(&image))
            .await
            .unwrap_or_else(|e| Err(NormalizeError::Interrupted(e.to_string())));

        let payload = match normalized {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Normalization failed: {}", e);
                self.dispatch(SessionEvent::NormalizationFailed(CaptureError::from(e)));
                return false;
            }
        };

        self.dispatch(SessionEvent::PayloadReady);
        info!(
            "Submitting {}x{} image ({} bytes) for recognition",
            payload.width(),
            payload.height(),
            payload.jpeg_bytes()
        );

        let recognizer = Arc::clone(&self.recognizer);
        let cancel = self.cancel.child_token();
        self.pending = Some(tokio::spawn(async move {
            recognizer.recognize(&payload, &cancel).await
        }));
        true
    }

    /// Wait for the pending request, if any, and apply its outcome
    ///
    /// Cancel safe: dropping the returned future before it resolves leaves
    /// the request pending. Never reopens the camera view, even if the user
    /// closed it while the request was running.
    pub async fn complete(&mut self) -> &CaptureSession {
        let Some(handle) = self.pending.as_mut() else {
            return &self.session;
        };
        let result = joined_result(handle.await);
        self.pending = None;

        info!("Recognition outcome: {}", result.kind());
        self.dispatch(SessionEvent::RecognitionCompleted(result))
    }

    /// Run one full cycle and wait for its outcome
    pub async fn capture_and_recognize(&mut self) -> &CaptureSession {
        self.capture().await;
        self.complete().await
    }

    /// Abort any request still running; used when the process exits
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

fn joined_result(joined: Result<RecognitionResult, JoinError>) -> RecognitionResult {
    joined.unwrap_or_else(|e| {
        warn!("Recognition task did not finish: {}", e);
        RecognitionResult::generic_failure()
    })
}
