//! Uploaded clip models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Container formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipExtension {
    Mp4,
    Mov,
}

impl ClipExtension {
    pub const ALL: &'static [ClipExtension] = &[ClipExtension::Mp4, ClipExtension::Mov];

    /// Extension without the leading dot.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipExtension::Mp4 => "mp4",
            ClipExtension::Mov => "mov",
        }
    }

    /// File suffix used when staging the clip on disk.
    pub fn suffix(&self) -> &'static str {
        match self {
            ClipExtension::Mp4 => ".mp4",
            ClipExtension::Mov => ".mov",
        }
    }

    /// MIME type announced to the remote file service.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ClipExtension::Mp4 => "video/mp4",
            ClipExtension::Mov => "video/quicktime",
        }
    }

    /// Derive the extension from an uploaded file name.
    pub fn from_file_name(name: &str) -> Result<Self, UnsupportedFormatError> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| UnsupportedFormatError(name.to_string()))?
            .parse()
            .map_err(|_| UnsupportedFormatError(name.to_string()))
    }
}

impl fmt::Display for ClipExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClipExtension {
    type Err = UnsupportedFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "mp4" => Ok(ClipExtension::Mp4),
            "mov" => Ok(ClipExtension::Mov),
            _ => Err(UnsupportedFormatError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unsupported clip format: {0} (expected .mp4 or .mov)")]
pub struct UnsupportedFormatError(pub String);

/// A gameplay clip received from a user, held in memory until staged.
#[derive(Clone)]
pub struct UploadedClip {
    /// Original file name as sent by the client
    pub file_name: String,
    /// Declared container format
    pub extension: ClipExtension,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl UploadedClip {
    /// Create a clip, deriving the extension from the file name.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UnsupportedFormatError> {
        let file_name = file_name.into();
        let extension = ClipExtension::from_file_name(&file_name)?;
        Ok(Self {
            file_name,
            extension,
            bytes,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime_type(&self) -> &'static str {
        self.extension.mime_type()
    }
}

// Clips can be hundreds of megabytes; never dump the bytes.
impl fmt::Debug for UploadedClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedClip")
            .field("file_name", &self.file_name)
            .field("extension", &self.extension)
            .field("len", &self.bytes.len())
            .finish()
    }
}
