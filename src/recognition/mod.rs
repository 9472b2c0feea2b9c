// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Food recognition over HTTP
//!
//! Wire contract:
//! - `POST {base}/api/capture` with `{"image": "<base64 JPEG>"}`
//! - success: `{"food_name": "...", "nutrition_info": {"<nutrient>": <value>, ...}}`
//! - error (optional): `{"message": "..."}`

pub mod client;
pub mod types;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::vision::NormalizedPayload;

pub use client::{RecognitionClient, DEFAULT_TIMEOUT_MS};
pub use types::{
    map_error_body, map_success_body, Nutrient, RecognitionResult, CANCELLED_FAILURE,
    GENERIC_FAILURE,
};

/// Anything that can turn a payload into a recognition outcome
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// One attempt; failures are folded into the result
    async fn recognize(
        &self,
        payload: &NormalizedPayload,
        cancel: &CancellationToken,
    ) -> RecognitionResult;
}
