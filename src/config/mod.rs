// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod scan;

pub use scan::{ScanConfig, DEFAULT_CAPTURE_PATH};
