// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the capture pipeline

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;
use url::Url;

use crate::recognition::DEFAULT_TIMEOUT_MS;
use crate::vision::{DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};

/// Fixed path of the recognition endpoint under the base URL
pub const DEFAULT_CAPTURE_PATH: &str = "/api/capture";

/// Injected settings for the recognition client and the normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Base URL of the recognition service
    pub base_url: String,
    /// Endpoint path appended to the base URL
    pub capture_path: String,
    /// Hard upper bound for one recognition request, in milliseconds
    pub timeout_ms: u64,
    /// Width bound for uploaded images, in pixels
    pub max_width: u32,
    /// JPEG quality in (0, 1]
    pub quality: f32,
    /// File or directory the file camera reads frames from
    pub camera_source: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            capture_path: DEFAULT_CAPTURE_PATH.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_QUALITY,
            camera_source: PathBuf::from("captures"),
        }
    }
}

impl ScanConfig {
    /// Load configuration: defaults, then an optional TOML file, then the
    /// environment (including a `.env` file if present)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from `NUTRASCAN_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| env::var(key).ok());
    }

    /// Override fields from any variable source
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("NUTRASCAN_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("NUTRASCAN_CAPTURE_PATH") {
            self.capture_path = v;
        }
        if let Some(v) = lookup("NUTRASCAN_CAMERA_SOURCE") {
            self.camera_source = PathBuf::from(v);
        }
        if let Some(v) = parse_var(&lookup, "NUTRASCAN_TIMEOUT_MS") {
            self.timeout_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "NUTRASCAN_MAX_WIDTH") {
            self.max_width = v;
        }
        if let Some(v) = parse_var(&lookup, "NUTRASCAN_QUALITY") {
            self.quality = v;
        }
    }

    /// Full URL of the recognition endpoint
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        let base = self.base_url.trim_end_matches('/');
        let path = self.capture_path.trim_start_matches('/');
        Url::parse(&format!("{}/{}", base, path))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_width == 0 {
            return Err("Max width must be greater than 0".to_string());
        }
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(format!("Quality must be in (0, 1], got {}", self.quality));
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        let endpoint = self
            .endpoint()
            .map_err(|e| format!("Invalid endpoint '{}': {}", self.base_url, e))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(format!("Unsupported endpoint scheme: {}", endpoint.scheme()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
