//! Remote asset service abstraction.
//!
//! The pipeline only talks to the remote inference service through
//! [`RemoteAssetService`], which keeps it testable against stubs.

use std::path::Path;

use async_trait::async_trait;

use clipcoach_gemini::GeminiClient;
use clipcoach_models::{ReadyAsset, RemoteAsset};

use crate::error::CoachResult;

/// Operations the pipeline needs from the remote file and generation API.
#[async_trait]
pub trait RemoteAssetService: Send + Sync {
    /// Model identifier reported back with feedback.
    fn model(&self) -> &str;

    /// Upload a staged file, returning its handle and initial state.
    async fn upload(&self, path: &Path, mime_type: &str, display_name: &str) -> CoachResult<RemoteAsset>;

    /// Re-fetch the state of an uploaded asset.
    async fn get_state(&self, name: &str) -> CoachResult<RemoteAsset>;

    /// Generate text for a ready asset.
    async fn generate(&self, asset: &ReadyAsset, instruction: &str) -> CoachResult<String>;

    /// Delete an uploaded asset.
    async fn delete(&self, name: &str) -> CoachResult<()>;
}

#[async_trait]
impl RemoteAssetService for GeminiClient {
    fn model(&self) -> &str {
        GeminiClient::model(self)
    }

    async fn upload(&self, path: &Path, mime_type: &str, display_name: &str) -> CoachResult<RemoteAsset> {
        Ok(self.upload_file(path, mime_type, display_name).await?)
    }

    async fn get_state(&self, name: &str) -> CoachResult<RemoteAsset> {
        Ok(self.get_file(name).await?)
    }

    async fn generate(&self, asset: &ReadyAsset, instruction: &str) -> CoachResult<String> {
        Ok(self.generate_content(asset, instruction).await?)
    }

    async fn delete(&self, name: &str) -> CoachResult<()> {
        Ok(self.delete_file(name).await?)
    }
}
