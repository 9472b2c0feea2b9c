// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Camera permission gate

pub mod gate;
pub mod provider;

use serde::{Deserialize, Serialize};

pub use gate::PermissionGate;
pub use provider::{PermissionError, PermissionProvider, SourcePermission};

/// Tri-state camera capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}
