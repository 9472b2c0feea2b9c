// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! RecognitionClient against a live HTTP endpoint
//!
//! Covers the response mapping rules end to end:
//! - 2xx with both fields → Recognized
//! - 2xx with missing/empty fields → Unrecognized
//! - non-2xx, network error or timeout → Failed, with the server message
//!   when one is provided

use axum::http::StatusCode;
use image::ImageFormat;
use nutrascan::recognition::{Nutrient, RecognitionClient, RecognitionResult, GENERIC_FAILURE};
use nutrascan::vision::{normalize, CapturedImage, NormalizedPayload};
use serde_json::json;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::common::{dead_endpoint, inspect_upload, png_bytes, spawn_service, Reply};

fn payload(width: u32, height: u32) -> NormalizedPayload {
    let raw = CapturedImage::new("memory://meal.png", png_bytes(width, height), width, height);
    normalize(&raw, 640, 0.7).unwrap()
}

#[tokio::test]
async fn test_recognized_response() {
    let (url, received) = spawn_service(Reply::json(
        StatusCode::OK,
        json!({"food_name": "Apple", "nutrition_info": {"calories": 95}}),
    ))
    .await;
    let client = RecognitionClient::new(url, 5_000).unwrap();

    let result = client
        .recognize(&payload(64, 48), &CancellationToken::new())
        .await;

    assert_eq!(
        result,
        RecognitionResult::Recognized {
            food_name: "Apple".to_string(),
            nutrients: vec![Nutrient::new("calories", 95)],
        }
    );
    assert_eq!(received.hits(), 1);
}

#[tokio::test]
async fn test_request_carries_bounded_jpeg() {
    let (url, received) = spawn_service(Reply::apple()).await;
    let client = RecognitionClient::new(url, 5_000).unwrap();

    client
        .recognize(&payload(1920, 1080), &CancellationToken::new())
        .await;

    let uploaded = received.last_image().expect("image field missing");
    let (format, width, height) = inspect_upload(&uploaded);
    assert_eq!(format, ImageFormat::Jpeg);
    assert_eq!(width, 640);
    assert_eq!(height, 360);
}

#[tokio::test]
async fn test_nutrients_keep_server_order() {
    let (url, _) = spawn_service(Reply::apple()).await;
    let client = RecognitionClient::new(url, 5_000).unwrap();

    match client
        .recognize(&payload(32, 32), &CancellationToken::new())
        .await
    {
        RecognitionResult::Recognized { nutrients, .. } => {
            let names: Vec<&str> = nutrients.iter().map(|n| n.name.as_str()).collect();
            assert_eq!(names, vec!["calories", "carbohydrates", "fiber"]);
            assert_eq!(nutrients[1].display_value(), "25g");
        }
        other => panic!("expected recognized, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_food_name_is_unrecognized() {
    let (url, _) = spawn_service(Reply::json(
        StatusCode::OK,
        json!({"nutrition_info": {"calories": 95}}),
    ))
    .await;
    let client = RecognitionClient::new(url, 5_000).unwrap();

    let result = client
        .recognize(&payload(32, 32), &CancellationToken::new())
        .await;
    assert_eq!(result, RecognitionResult::Unrecognized);
}

#[tokio::test]
async fn test_error_message_is_surfaced() {
    let (url, _) = spawn_service(Reply::json(
        StatusCode::BAD_REQUEST,
        json!({"message": "Bad image"}),
    ))
    .await;
    let client = RecognitionClient::new(url, 5_000).unwrap();

    let result = client
        .recognize(&payload(32, 32), &CancellationToken::new())
        .await;
    assert_eq!(result, RecognitionResult::failed("Bad image"));
}

#[tokio::test]
async fn test_backend_error_field_is_surfaced() {
    let (url, _) = spawn_service(Reply::json(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "Food prediction failed"}),
    ))
    .await;
    let client = RecognitionClient::new(url, 5_000).unwrap();

    let result = client
        .recognize(&payload(32, 32), &CancellationToken::new())
        .await;
    assert_eq!(result, RecognitionResult::failed("Food prediction failed"));
}

#[tokio::test]
async fn test_error_without_message_is_generic() {
    let (url, received) =
        spawn_service(Reply::raw(StatusCode::BAD_GATEWAY, "upstream unavailable")).await;
    let client = RecognitionClient::new(url, 5_000).unwrap();

    let result = client
        .recognize(&payload(32, 32), &CancellationToken::new())
        .await;
    assert_eq!(result, RecognitionResult::failed(GENERIC_FAILURE));
    // no retry
    assert_eq!(received.hits(), 1);
}

#[tokio::test]
async fn test_timeout_is_enforced_by_client() {
    let (url, received) =
        spawn_service(Reply::apple().delayed(Duration::from_secs(3))).await;
    let client = RecognitionClient::new(url, 200).unwrap();

    let start = Instant::now();
    let result = client
        .recognize(&payload(32, 32), &CancellationToken::new())
        .await;

    assert_eq!(result, RecognitionResult::failed(GENERIC_FAILURE));
    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(received.hits(), 1);
}

#[tokio::test]
async fn test_connection_refused_is_generic_failure() {
    let client = RecognitionClient::new(dead_endpoint(), 5_000).unwrap();
    let result = client
        .recognize(&payload(32, 32), &CancellationToken::new())
        .await;
    assert_eq!(result, RecognitionResult::failed(GENERIC_FAILURE));
}
