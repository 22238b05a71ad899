//! Remote asset handles and readiness states.
//!
//! An asset is a file held by the remote inference service. The local process
//! only keeps its handle and the last observed state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle stage of an uploaded asset on the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetState {
    /// Remote service reported no state yet
    #[default]
    #[serde(rename = "STATE_UNSPECIFIED")]
    Unspecified,
    /// Asset is still being processed
    Processing,
    /// Asset is ready to be referenced in a generation request
    Active,
    /// Remote processing failed
    Failed,
}

impl AssetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetState::Unspecified => "STATE_UNSPECIFIED",
            AssetState::Processing => "PROCESSING",
            AssetState::Active => "ACTIVE",
            AssetState::Failed => "FAILED",
        }
    }

    /// Check if this is a terminal state (no further transitions expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssetState::Active | AssetState::Failed)
    }
}

impl fmt::Display for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference to a file held by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAsset {
    /// Resource name, e.g. `files/abc123`
    pub name: String,
    /// URI used to reference the file in generation requests
    pub uri: String,
    pub mime_type: String,
    pub state: AssetState,
    /// Error message reported by the service when processing failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RemoteAsset {
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Convert into a [`ReadyAsset`] if the asset is active.
    pub fn into_ready(self) -> Result<ReadyAsset, RemoteAsset> {
        if self.state == AssetState::Active {
            Ok(ReadyAsset(self))
        } else {
            Err(self)
        }
    }
}

/// A remote asset that was observed in the `ACTIVE` state.
///
/// Only obtainable through [`RemoteAsset::into_ready`], so a generation
/// request taking `&ReadyAsset` can never see a processing asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyAsset(RemoteAsset);

impl ReadyAsset {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn uri(&self) -> &str {
        &self.0.uri
    }

    pub fn mime_type(&self) -> &str {
        &self.0.mime_type
    }

    pub fn as_asset(&self) -> &RemoteAsset {
        &self.0
    }

    pub fn into_inner(self) -> RemoteAsset {
        self.0
    }
}
