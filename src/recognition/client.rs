// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP client for the food recognition service

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::types::{
    map_error_body, map_success_body, CaptureRequest, RecognitionResult, CANCELLED_FAILURE,
};
use super::Recognizer;
use crate::vision::NormalizedPayload;

/// Default hard upper bound for one recognition round trip
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

/// Client for the recognition endpoint
///
/// Exactly one attempt per call. The timeout is enforced here around the
/// whole exchange (connect, upload, response body), independent of any
/// transport-level defaults.
pub struct RecognitionClient {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl RecognitionClient {
    /// Create a new recognition client
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the capture endpoint
    /// * `timeout_ms` - Upper bound for one request
    pub fn new(endpoint: Url, timeout_ms: u64) -> Result<Self> {
        if timeout_ms == 0 {
            return Err(anyhow::anyhow!("timeout must be greater than 0"));
        }

        let client = Client::builder().build()?;

        info!(
            "Recognition client configured: endpoint={}, timeout={}ms",
            endpoint, timeout_ms
        );

        Ok(Self {
            client,
            endpoint,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Submit one payload and map the outcome
    ///
    /// Never fails: transport errors, non-2xx statuses, timeouts and
    /// cancellation all come back as `RecognitionResult::Failed`.
    pub async fn recognize(
        &self,
        payload: &NormalizedPayload,
        cancel: &CancellationToken,
    ) -> RecognitionResult {
        let start = Instant::now();

        let result = tokio::select! {
            outcome = tokio::time::timeout(self.timeout, self.exchange(payload)) => {
                match outcome {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(
                            "Recognition request timed out after {}ms",
                            self.timeout.as_millis()
                        );
                        RecognitionResult::generic_failure()
                    }
                }
            }
            _ = cancel.cancelled() => {
                warn!("Recognition request cancelled");
                RecognitionResult::failed(CANCELLED_FAILURE)
            }
        };

        info!(
            "Recognition finished: outcome={}, elapsed={}ms",
            result.kind(),
            start.elapsed().as_millis()
        );
        result
    }

    async fn exchange(&self, payload: &NormalizedPayload) -> RecognitionResult {
        debug!(
            "POST {} ({}x{}, {} base64 chars)",
            self.endpoint,
            payload.width(),
            payload.height(),
            payload.as_base64().len()
        );

        let response = match self
            .client
            .post(self.endpoint.clone())
            .json(&CaptureRequest {
                image: payload.as_base64(),
            })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Recognition request failed: {}", e);
                return RecognitionResult::generic_failure();
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read recognition response ({}): {}", status, e);
                return RecognitionResult::generic_failure();
            }
        };

        if status.is_success() {
            map_success_body(&body)
        } else {
            warn!("Recognition service returned {}", status);
            map_error_body(&body)
        }
    }
}

#[async_trait]
impl Recognizer for RecognitionClient {
    async fn recognize(
        &self,
        payload: &NormalizedPayload,
        cancel: &CancellationToken,
    ) -> RecognitionResult {
        RecognitionClient::recognize(self, payload, cancel).await
    }
}
