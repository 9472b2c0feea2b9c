// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image values passed between the camera, the normalizer and the client

use std::fmt;

/// Raw frame produced by a camera for one capture cycle
///
/// Owned by the capture session until the next capture supersedes it.
#[derive(Clone, PartialEq)]
pub struct CapturedImage {
    /// Where the camera left the frame (file path or device handle)
    pub uri: String,
    /// Encoded frame bytes as produced by the camera
    pub data: Vec<u8>,
    /// Source width in pixels
    pub width: u32,
    /// Source height in pixels
    pub height: u32,
}

impl CapturedImage {
    pub fn new(uri: impl Into<String>, data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            uri: uri.into(),
            data,
            width,
            height,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

// Frame bytes are never printed
impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("uri", &self.uri)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("size_bytes", &self.data.len())
            .finish()
    }
}

/// Bounded, JPEG-encoded, base64 text ready for transport
#[derive(Clone, PartialEq)]
pub struct NormalizedPayload {
    encoded: String,
    width: u32,
    height: u32,
    jpeg_bytes: usize,
}

impl NormalizedPayload {
    pub(crate) fn new(encoded: String, width: u32, height: u32, jpeg_bytes: usize) -> Self {
        Self {
            encoded,
            width,
            height,
            jpeg_bytes,
        }
    }

    /// Base64 text of the JPEG
    pub fn as_base64(&self) -> &str {
        &self.encoded
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size of the JPEG before base64 encoding
    pub fn jpeg_bytes(&self) -> usize {
        self.jpeg_bytes
    }
}

impl fmt::Debug for NormalizedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedPayload")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("jpeg_bytes", &self.jpeg_bytes)
            .field("encoded_len", &self.encoded.len())
            .finish()
    }
}
