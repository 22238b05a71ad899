//! Gemini HTTP client.

use std::path::Path;

use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, Client, Response};
use tracing::{debug, info};

use clipcoach_models::{ReadyAsset, RemoteAsset};

use crate::config::GeminiConfig;
use crate::error::{GeminiError, GeminiResult};
use crate::types::{
    Content, ErrorEnvelope, FileResource, GenerateRequest, GenerateResponse, Part,
    UploadFileMetadata, UploadResponse, UploadStartRequest,
};

/// Client for the Gemini File API and `generateContent`.
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GeminiError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> GeminiResult<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Model identifier used for generation.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Upload a local file using the resumable upload protocol.
    ///
    /// The returned asset is usually still `PROCESSING`.
    pub async fn upload_file(
        &self,
        path: &Path,
        mime_type: &str,
        display_name: &str,
    ) -> GeminiResult<RemoteAsset> {
        // Streamed from disk so the clip is not buffered a second time
        let file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();

        debug!(
            path = %path.display(),
            mime_type = %mime_type,
            size_bytes = size,
            "Starting resumable upload"
        );

        let start = self
            .http
            .post(self.endpoint("upload/v1beta/files"))
            .query(&[("key", self.config.api_key.as_str())])
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&UploadStartRequest {
                file: UploadFileMetadata {
                    display_name: display_name.to_string(),
                },
            })
            .send()
            .await?;

        let start = ensure_success(start).await?;

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .ok_or_else(|| GeminiError::invalid_response("Upload start response missing x-goog-upload-url"))?;

        let finish = self
            .http
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header(CONTENT_LENGTH, size)
            .body(Body::from(file))
            .send()
            .await?;

        let finish = ensure_success(finish).await?;
        let uploaded: UploadResponse = finish.json().await?;
        let asset = RemoteAsset::from(uploaded.file);

        info!(
            asset = %asset.name,
            state = %asset.state,
            size_bytes = size,
            "Uploaded clip to Gemini File API"
        );

        Ok(asset)
    }

    /// Fetch the current state of an uploaded file.
    pub async fn get_file(&self, name: &str) -> GeminiResult<RemoteAsset> {
        let response = self
            .http
            .get(self.endpoint(&format!("v1beta/{}", name)))
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let file: FileResource = response.json().await?;
        Ok(RemoteAsset::from(file))
    }

    /// Generate text for a ready file and an instruction.
    pub async fn generate_content(
        &self,
        asset: &ReadyAsset,
        instruction: &str,
    ) -> GeminiResult<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::file(asset.mime_type(), asset.uri()),
                    Part::text(instruction),
                ],
            }],
        };

        info!(model = %self.config.model, asset = %asset.name(), "Requesting Gemini feedback");

        let response = self
            .http
            .post(self.endpoint(&format!(
                "v1beta/models/{}:generateContent",
                self.config.model
            )))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let generated: GenerateResponse = response.json().await?;

        if let Some(reason) = generated.block_reason() {
            return Err(GeminiError::Blocked(reason.to_string()));
        }

        generated.text().ok_or_else(|| {
            let finish = generated
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            GeminiError::invalid_response(format!("No text in Gemini response ({})", finish))
        })
    }

    /// Delete an uploaded file.
    pub async fn delete_file(&self, name: &str) -> GeminiResult<()> {
        let response = self
            .http
            .delete(self.endpoint(&format!("v1beta/{}", name)))
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        ensure_success(response).await?;
        debug!(asset = %name, "Deleted remote file");
        Ok(())
    }
}

/// Turn a non-2xx response into [`GeminiError::Api`].
async fn ensure_success(response: Response) -> GeminiResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    Err(GeminiError::Api { status, message })
}
