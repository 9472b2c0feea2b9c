// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared helpers: an in-process recognition service and image fixtures

#![allow(dead_code)]

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageBuffer, ImageFormat, Rgb};
use serde_json::{json, Value};
use std::io::Cursor;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Canned reply for the fake recognition service
#[derive(Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn apple() -> Self {
        Self::json(
            StatusCode::OK,
            json!({
                "food_name": "Apple",
                "nutrition_info": {"calories": 95, "carbohydrates": "25g", "fiber": 4.4}
            }),
        )
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// What the fake service saw
#[derive(Default)]
pub struct Received {
    pub hits: AtomicUsize,
    pub last_image: Mutex<Option<String>>,
}

impl Received {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_image(&self) -> Option<String> {
        self.last_image.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct ServiceState {
    reply: Reply,
    received: Arc<Received>,
}

async fn capture_handler(
    State(state): State<ServiceState>,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    state.received.hits.fetch_add(1, Ordering::SeqCst);
    *state.received.last_image.lock().unwrap() =
        body.get("image").and_then(|v| v.as_str()).map(str::to_string);

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }
    (state.reply.status, state.reply.body.clone())
}

/// Start a fake recognition service answering every request with `reply`
pub async fn spawn_service(reply: Reply) -> (Url, Arc<Received>) {
    let received = Arc::new(Received::default());
    let state = ServiceState {
        reply,
        received: received.clone(),
    };
    let app = Router::new()
        .route("/api/capture", post(capture_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let url = Url::parse(&format!("http://{}/api/capture", addr)).unwrap();
    (url, received)
}

/// Endpoint nothing listens on
pub fn dead_endpoint() -> Url {
    Url::parse("http://127.0.0.1:9/api/capture").unwrap()
}

/// PNG bytes with a simple gradient
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    std::fs::write(path, png_bytes(width, height)).unwrap();
}

/// Decode an uploaded payload and return (format, width, height)
pub fn inspect_upload(encoded: &str) -> (ImageFormat, u32, u32) {
    let bytes = STANDARD.decode(encoded).unwrap();
    let format = image::guess_format(&bytes).unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    (format, img.width(), img.height())
}
