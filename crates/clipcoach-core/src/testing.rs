//! Scripted remote service for pipeline tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use clipcoach_models::{AssetState, ReadyAsset, RemoteAsset};

use crate::error::{CoachError, CoachResult};
use crate::service::RemoteAssetService;

pub(crate) const ASSET_NAME: &str = "files/stub-asset";

/// Remote service whose asset walks through a scripted list of states.
///
/// Once the script runs out, the last state repeats forever.
pub(crate) struct StubService {
    current: Mutex<AssetState>,
    script: Mutex<VecDeque<AssetState>>,
    feedback: Result<String, String>,
    upload_error: Option<String>,
    delete_error: bool,
    state_fetches: Mutex<u32>,
    generate_seen: Mutex<Vec<AssetState>>,
    deleted: Mutex<Vec<String>>,
    uploaded: Mutex<Vec<PathBuf>>,
}

impl StubService {
    pub(crate) fn new(initial: AssetState, then: &[AssetState]) -> Self {
        Self {
            current: Mutex::new(initial),
            script: Mutex::new(then.iter().copied().collect()),
            feedback: Ok("Keep your crosshair at head height.".to_string()),
            upload_error: None,
            delete_error: false,
            state_fetches: Mutex::new(0),
            generate_seen: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            uploaded: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_feedback(mut self, text: &str) -> Self {
        self.feedback = Ok(text.to_string());
        self
    }

    pub(crate) fn with_generate_error(mut self, msg: &str) -> Self {
        self.feedback = Err(msg.to_string());
        self
    }

    pub(crate) fn with_upload_error(mut self, msg: &str) -> Self {
        self.upload_error = Some(msg.to_string());
        self
    }

    pub(crate) fn with_delete_error(mut self) -> Self {
        self.delete_error = true;
        self
    }

    pub(crate) fn state_fetches(&self) -> u32 {
        *self.state_fetches.lock().unwrap()
    }

    /// Remote state of the asset at each generate call.
    pub(crate) fn generate_seen(&self) -> Vec<AssetState> {
        self.generate_seen.lock().unwrap().clone()
    }

    pub(crate) fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub(crate) fn uploaded(&self) -> Vec<PathBuf> {
        self.uploaded.lock().unwrap().clone()
    }

    fn snapshot(&self) -> RemoteAsset {
        let state = *self.current.lock().unwrap();
        RemoteAsset {
            name: ASSET_NAME.to_string(),
            uri: format!("https://files.test/v1beta/{}", ASSET_NAME),
            mime_type: "video/mp4".to_string(),
            state,
            error: (state == AssetState::Failed).then(|| "unsupported codec".to_string()),
        }
    }
}

#[async_trait]
impl RemoteAssetService for StubService {
    fn model(&self) -> &str {
        "stub-model"
    }

    async fn upload(&self, path: &Path, _mime_type: &str, _display_name: &str) -> CoachResult<RemoteAsset> {
        if let Some(msg) = &self.upload_error {
            return Err(CoachError::transport(msg.clone()));
        }
        self.uploaded.lock().unwrap().push(path.to_path_buf());
        Ok(self.snapshot())
    }

    async fn get_state(&self, _name: &str) -> CoachResult<RemoteAsset> {
        *self.state_fetches.lock().unwrap() += 1;
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            *self.current.lock().unwrap() = next;
        }
        Ok(self.snapshot())
    }

    async fn generate(&self, _asset: &ReadyAsset, _instruction: &str) -> CoachResult<String> {
        let state = *self.current.lock().unwrap();
        self.generate_seen.lock().unwrap().push(state);
        self.feedback.clone().map_err(CoachError::transport)
    }

    async fn delete(&self, name: &str) -> CoachResult<()> {
        self.deleted.lock().unwrap().push(name.to_string());
        if self.delete_error {
            return Err(CoachError::transport("delete refused"));
        }
        Ok(())
    }
}
