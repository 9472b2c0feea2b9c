// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Recognition wire contract and typed outcomes

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Reason used when the service gives no message of its own
pub const GENERIC_FAILURE: &str = "Failed to recognize food. Please try again.";

/// Reason used when the controller shuts down mid-request
pub const CANCELLED_FAILURE: &str = "Recognition was cancelled.";

/// One nutrient row as sent by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrient {
    pub name: String,
    /// Opaque scalar (number or string in practice), kept as sent
    pub value: Value,
}

impl Nutrient {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Value as shown in the results panel
    pub fn display_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.display_value())
    }
}

/// Outcome of one recognition attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecognitionResult {
    /// The service named the food and returned nutrients in display order
    Recognized {
        food_name: String,
        nutrients: Vec<Nutrient>,
    },
    /// The service answered but found no match
    Unrecognized,
    /// Transport error, non-2xx status or timeout
    Failed { reason: String },
}

impl RecognitionResult {
    pub fn failed(reason: impl Into<String>) -> Self {
        RecognitionResult::Failed {
            reason: reason.into(),
        }
    }

    pub fn generic_failure() -> Self {
        Self::failed(GENERIC_FAILURE)
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, RecognitionResult::Recognized { .. })
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            RecognitionResult::Recognized { .. } => "recognized",
            RecognitionResult::Unrecognized => "unrecognized",
            RecognitionResult::Failed { .. } => "failed",
        }
    }
}

/// Request body: `{"image": "<base64 JPEG>"}`
#[derive(Debug, Serialize)]
pub struct CaptureRequest<'a> {
    pub image: &'a str,
}

/// Success body: `{"food_name": ..., "nutrition_info": {...}}`
#[derive(Debug, Default, Deserialize)]
pub struct CaptureResponse {
    #[serde(default)]
    pub food_name: Option<Value>,
    #[serde(default)]
    pub nutrition_info: Option<Value>,
}

/// Optional error body; `message` is preferred, `error` is what the
/// reference backend emits
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl ErrorBody {
    /// First non-empty string among `message` and `error`
    pub fn reason(&self) -> Option<String> {
        [&self.message, &self.error]
            .into_iter()
            .flatten()
            .filter_map(|v| v.as_str())
            .find(|s| !s.trim().is_empty())
            .map(str::to_string)
    }
}

/// Map a 2xx body onto a result
///
/// Both fields must be present and non-empty; anything else, including a
/// body that is not JSON, means the service found no match.
pub fn map_success_body(body: &[u8]) -> RecognitionResult {
    let response: CaptureResponse = match serde_json::from_slice(body) {
        Ok(response) => response,
        Err(_) => return RecognitionResult::Unrecognized,
    };

    let food_name = match response.food_name.as_ref().and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => return RecognitionResult::Unrecognized,
    };

    let nutrients: Vec<Nutrient> = match response.nutrition_info {
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(name, value)| Nutrient { name, value })
            .collect(),
        _ => return RecognitionResult::Unrecognized,
    };

    if nutrients.is_empty() {
        return RecognitionResult::Unrecognized;
    }

    RecognitionResult::Recognized {
        food_name,
        nutrients,
    }
}

/// Map a non-2xx body onto a failure, surfacing the server message verbatim
pub fn map_error_body(body: &[u8]) -> RecognitionResult {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.reason())
        .map(RecognitionResult::failed)
        .unwrap_or_else(RecognitionResult::generic_failure)
}
