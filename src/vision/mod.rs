// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image handling for the capture pipeline
//!
//! This module provides:
//! - Format detection and decoding of camera frames
//! - Normalization of a frame into a bounded base64 JPEG payload

pub mod image_utils;
pub mod normalizer;
pub mod types;

pub use image_utils::{decode_image_bytes, detect_format, probe_image_bytes, ImageError, ImageInfo};
pub use normalizer::{normalize, ImageNormalizer, NormalizeError, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
pub use types::{CapturedImage, NormalizedPayload};
