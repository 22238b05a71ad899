//! Gemini API wire types.

use serde::{Deserialize, Serialize};

use clipcoach_models::{AssetState, RemoteAsset};

/// File resource as returned by the File API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResource {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub size_bytes: Option<String>,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub state: AssetState,
    #[serde(default)]
    pub error: Option<Status>,
}

impl From<FileResource> for RemoteAsset {
    fn from(file: FileResource) -> Self {
        RemoteAsset {
            name: file.name,
            uri: file.uri,
            mime_type: file.mime_type,
            state: file.state,
            error: file.error.map(|e| e.message),
        }
    }
}

/// Google RPC status embedded in failed files and error bodies.
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Body of the final resumable upload response.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub file: FileResource,
}

/// Metadata sent when starting a resumable upload.
#[derive(Debug, Serialize)]
pub struct UploadStartRequest {
    pub file: UploadFileMetadata,
}

#[derive(Debug, Serialize)]
pub struct UploadFileMetadata {
    pub display_name: String,
}

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Status,
}

/// `generateContent` request.
#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// One request part: either a file reference or a text segment.
#[derive(Debug, Serialize)]
pub struct Part {
    #[serde(rename = "fileData", skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn file(mime_type: &str, file_uri: &str) -> Self {
        Self {
            file_data: Some(FileData {
                mime_type: mime_type.to_string(),
                file_uri: file_uri.to_string(),
            }),
            text: None,
        }
    }

    pub fn text(text: &str) -> Self {
        Self {
            file_data: None,
            text: Some(text.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "fileUri")]
    pub file_uri: String,
}

/// `generateContent` response.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback", default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromptFeedback {
    #[serde(rename = "blockReason", default)]
    pub block_reason: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Block reason reported for the prompt, if any.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}
