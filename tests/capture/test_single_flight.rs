// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! At most one recognition request per session, and late responses never
//! reopen the camera

use nutrascan::capture::{CaptureController, FileCamera, Phase};
use nutrascan::permission::{PermissionGate, SourcePermission};
use nutrascan::recognition::{RecognitionClient, RecognitionResult};
use nutrascan::vision::ImageNormalizer;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::common::{spawn_service, write_png, Reply};

fn controller_for(source: &Path, endpoint: Url) -> CaptureController {
    CaptureController::new(
        PermissionGate::new(Arc::new(SourcePermission::new(source))),
        Arc::new(FileCamera::new(source)),
        ImageNormalizer::default(),
        Arc::new(RecognitionClient::new(endpoint, 5_000).unwrap()),
    )
}

#[tokio::test]
async fn test_late_response_does_not_reopen_camera() {
    let dir = tempfile::tempdir().unwrap();
    let frame = dir.path().join("meal.png");
    write_png(&frame, 800, 600);
    let (url, received) =
        spawn_service(Reply::apple().delayed(Duration::from_millis(300))).await;

    let mut controller = controller_for(&frame, url);
    controller.initialize().await;
    controller.toggle_camera();

    assert!(controller.capture().await);
    assert!(controller.is_pending());
    assert!(controller.session().in_flight());
    assert_eq!(controller.session().phase(), Phase::Recognizing);

    // user closes the camera while the request is running
    controller.toggle_camera();
    assert!(!controller.session().camera_open());
    assert!(controller.session().in_flight());

    let session = controller.complete().await;
    assert!(session.result().map(RecognitionResult::is_recognized).unwrap_or(false));
    assert!(!session.camera_open());
    assert!(!session.in_flight());
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(received.hits(), 1);
}

#[tokio::test]
async fn test_second_capture_while_in_flight_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let frame = dir.path().join("meal.png");
    write_png(&frame, 320, 240);
    let (url, received) =
        spawn_service(Reply::apple().delayed(Duration::from_millis(300))).await;

    let mut controller = controller_for(&frame, url);
    controller.initialize().await;
    controller.toggle_camera();

    assert!(controller.capture().await);

    // close and reopen the view, then trigger again
    controller.toggle_camera();
    controller.toggle_camera();
    assert!(controller.session().camera_open());
    assert!(!controller.session().can_capture());
    assert!(!controller.capture().await);
    assert!(!controller.capture().await);

    let session = controller.complete().await;
    assert!(!session.in_flight());
    assert_eq!(received.hits(), 1);
}

#[tokio::test]
async fn test_abandoned_wait_keeps_request_pending() {
    let dir = tempfile::tempdir().unwrap();
    let frame = dir.path().join("meal.png");
    write_png(&frame, 320, 240);
    let (url, received) =
        spawn_service(Reply::apple().delayed(Duration::from_millis(300))).await;

    let mut controller = controller_for(&frame, url);
    controller.initialize().await;
    controller.toggle_camera();
    assert!(controller.capture().await);

    // stop waiting before the response arrives
    let waited = tokio::time::timeout(Duration::from_millis(20), controller.complete()).await;
    assert!(waited.is_err());
    assert!(controller.is_pending());
    assert!(controller.session().in_flight());

    tokio::time::sleep(Duration::from_millis(400)).await;
    let session = controller.complete().await;
    assert!(session.result().map(RecognitionResult::is_recognized).unwrap_or(false));
    assert!(!session.in_flight());
    assert!(!controller.is_pending());

    // the session accepts a new cycle afterwards
    controller.toggle_camera();
    assert!(controller.session().can_capture());
    assert!(controller.capture().await);
    controller.complete().await;
    assert_eq!(received.hits(), 2);
}

#[tokio::test]
async fn test_complete_without_request_returns_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let frame = dir.path().join("meal.png");
    write_png(&frame, 32, 32);
    let (url, received) = spawn_service(Reply::apple()).await;

    let mut controller = controller_for(&frame, url);
    controller.initialize().await;

    let session = controller.complete().await;
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.result().is_none());
    assert_eq!(received.hits(), 0);
}

#[tokio::test]
async fn test_new_cycle_after_completion() {
    let dir = tempfile::tempdir().unwrap();
    let frame = dir.path().join("meal.png");
    write_png(&frame, 320, 240);
    let (url, received) = spawn_service(Reply::apple()).await;

    let mut controller = controller_for(&frame, url);
    controller.initialize().await;

    for round in 1..=2 {
        controller.toggle_camera();
        let session = controller.capture_and_recognize().await;
        assert!(!session.in_flight());
        assert!(session.result().is_some());
        assert_eq!(received.hits(), round);
    }
}
