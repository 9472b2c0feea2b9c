// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! One-shot camera permission gate

use std::sync::Arc;
use tracing::{info, warn};

use super::provider::PermissionProvider;
use super::PermissionState;

/// Wraps the platform capability check
///
/// The state leaves `Unknown` exactly once. Later calls return the
/// recorded answer without prompting again.
pub struct PermissionGate {
    provider: Arc<dyn PermissionProvider>,
    state: PermissionState,
}

impl PermissionGate {
    pub fn new(provider: Arc<dyn PermissionProvider>) -> Self {
        Self {
            provider,
            state: PermissionState::Unknown,
        }
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    /// Resolve camera access, prompting the platform on the first call
    ///
    /// Query failures and undetermined answers resolve to `Denied`.
    pub async fn request_permission(&mut self) -> PermissionState {
        if self.state != PermissionState::Unknown {
            return self.state;
        }

        let resolved = match self.provider.request().await {
            Ok(PermissionState::Unknown) => {
                warn!(
                    "Permission provider '{}' returned an undetermined answer; treating as denied",
                    self.provider.name()
                );
                PermissionState::Denied
            }
            Ok(state) => state,
            Err(e) => {
                warn!(
                    "Permission provider '{}' failed: {}; treating as denied",
                    self.provider.name(),
                    e
                );
                PermissionState::Denied
            }
        };

        info!("Camera permission resolved: {:?}", resolved);
        self.state = resolved;
        resolved
    }
}
