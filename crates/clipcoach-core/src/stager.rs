//! Local staging of uploaded clips.
//!
//! The remote upload reads from disk, so the in-memory clip is written to a
//! temp file whose suffix matches its container format.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::{debug, warn};

use clipcoach_models::{ClipExtension, UploadedClip};

use crate::error::{CoachError, CoachResult};

/// A clip written to a temporary file.
///
/// The file is removed by [`StagedClip::cleanup`], or on drop if cleanup is
/// never called.
#[derive(Debug)]
pub struct StagedClip {
    path: TempPath,
    extension: ClipExtension,
    display_name: String,
    len: usize,
}

impl StagedClip {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> ClipExtension {
        self.extension
    }

    pub fn mime_type(&self) -> &'static str {
        self.extension.mime_type()
    }

    /// Original file name, used as the remote display name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Delete the temp file. Failures are logged and otherwise ignored.
    pub fn cleanup(self) {
        let path: PathBuf = self.path.to_path_buf();
        match self.path.close() {
            Ok(()) => debug!(path = %path.display(), "Removed staged clip"),
            Err(e) => warn!(path = %path.display(), "Failed to remove staged clip: {}", e),
        }
    }
}

/// Write `clip` to a temp file in `work_dir` (or the system temp dir).
///
/// Runs the write on the blocking pool; clips can be large.
pub async fn stage_clip(clip: UploadedClip, work_dir: Option<PathBuf>) -> CoachResult<StagedClip> {
    tokio::task::spawn_blocking(move || write_clip(clip, work_dir.as_deref()))
        .await
        .map_err(|e| CoachError::Staging(std::io::Error::other(e)))?
}

fn write_clip(clip: UploadedClip, work_dir: Option<&Path>) -> CoachResult<StagedClip> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("clipcoach-").suffix(clip.extension.suffix());

    let mut file = match work_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            builder.tempfile_in(dir)?
        }
        None => builder.tempfile()?,
    };

    file.write_all(&clip.bytes)?;
    file.flush()?;

    let path = file.into_temp_path();
    debug!(path = %path.display(), size_bytes = clip.bytes.len(), "Staged clip");

    Ok(StagedClip {
        path,
        extension: clip.extension,
        display_name: clip.file_name,
        len: clip.bytes.len(),
    })
}
