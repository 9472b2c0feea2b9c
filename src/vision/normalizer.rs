// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client-side image normalization
//!
//! Every captured frame goes through the same transform before upload:
//! 1. Decode whatever format the camera produced
//! 2. Downscale to at most `max_width` pixels wide, preserving aspect ratio
//! 3. Re-encode as JPEG at the configured quality
//! 4. Base64 encode the JPEG for the JSON request body

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage, GenericImageView};
use thiserror::Error;
use tracing::debug;

use super::image_utils::{decode_image_bytes, ImageError};
use super::types::{CapturedImage, NormalizedPayload};

/// Default width bound for uploads
pub const DEFAULT_MAX_WIDTH: u32 = 640;

/// Default JPEG quality (0..=1)
pub const DEFAULT_QUALITY: f32 = 0.7;

/// Errors that abort the current capture cycle
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("max width must be greater than 0")]
    InvalidMaxWidth,

    #[error("quality must be in (0, 1], got {0}")]
    InvalidQuality(f32),

    #[error("captured image is unreadable: {0}")]
    Unreadable(#[from] ImageError),

    #[error("failed to encode JPEG: {0}")]
    EncodeFailed(String),

    #[error("normalization did not finish: {0}")]
    Interrupted(String),
}

/// Resize + JPEG + base64 transform with fixed parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageNormalizer {
    max_width: u32,
    quality: f32,
}

impl ImageNormalizer {
    /// Create a normalizer, rejecting out-of-range parameters up front
    pub fn new(max_width: u32, quality: f32) -> Result<Self, NormalizeError> {
        check_parameters(max_width, quality)?;
        Ok(Self { max_width, quality })
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn normalize(&self, raw: &CapturedImage) -> Result<NormalizedPayload, NormalizeError> {
        normalize(raw, self.max_width, self.quality)
    }
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Normalize a captured frame into an upload payload
///
/// The output is always a base64 JPEG no wider than `max_width`.
/// Narrower frames keep their size; they are never upscaled.
pub fn normalize(
    raw: &CapturedImage,
    max_width: u32,
    quality: f32,
) -> Result<NormalizedPayload, NormalizeError> {
    check_parameters(max_width, quality)?;

    let (img, info) = decode_image_bytes(&raw.data)?;
    debug!(
        "Decoded capture {}: {}x{} {:?} ({} bytes)",
        raw.uri, info.width, info.height, info.format, info.size_bytes
    );

    let resized = fit_width(img, max_width);
    let (width, height) = resized.dimensions();

    // JPEG has no alpha channel
    let rgb = resized.to_rgb8();
    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, jpeg_quality(quality));
    rgb.write_with_encoder(encoder)
        .map_err(|e| NormalizeError::EncodeFailed(e.to_string()))?;

    let jpeg_bytes = jpeg.len();
    let encoded = STANDARD.encode(&jpeg);
    debug!(
        "Normalized capture to {}x{} JPEG ({} bytes, {} base64 chars)",
        width,
        height,
        jpeg_bytes,
        encoded.len()
    );

    Ok(NormalizedPayload::new(encoded, width, height, jpeg_bytes))
}

/// Target dimensions for a source of `width` x `height` under `max_width`
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let scale = max_width as f64 / width as f64;
    let new_height = ((height as f64 * scale).round() as u32).max(1);
    (max_width, new_height)
}

fn fit_width(img: DynamicImage, max_width: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    let (new_w, new_h) = target_dimensions(w, h, max_width);
    if (new_w, new_h) == (w, h) {
        return img;
    }
    img.resize_exact(new_w, new_h, FilterType::Lanczos3)
}

fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

fn check_parameters(max_width: u32, quality: f32) -> Result<(), NormalizeError> {
    if max_width == 0 {
        return Err(NormalizeError::InvalidMaxWidth);
    }
    if !(quality > 0.0 && quality <= 1.0) {
        return Err(NormalizeError::InvalidQuality(quality));
    }
    Ok(())
}
