//! Feedback request against a ready asset.

use tracing::debug;

use clipcoach_models::ReadyAsset;

use crate::error::{CoachError, CoachResult};
use crate::service::RemoteAssetService;

/// Issue one generation call for `asset` and return the trimmed text.
///
/// Taking `&ReadyAsset` means this can only run after the poller has seen the
/// asset become active. No retries.
pub async fn request_feedback(
    service: &dyn RemoteAssetService,
    asset: &ReadyAsset,
    instruction: &str,
) -> CoachResult<String> {
    let text = service.generate(asset, instruction).await?;
    let text = text.trim();

    if text.is_empty() {
        return Err(CoachError::no_feedback(format!(
            "model returned empty text for {}",
            asset.name()
        )));
    }

    debug!(asset = %asset.name(), chars = text.len(), "Received feedback text");
    Ok(text.to_string())
}
