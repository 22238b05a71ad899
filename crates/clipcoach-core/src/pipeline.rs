//! End-to-end feedback pipeline.
//!
//! One run: stage → upload → poll → generate → delete remote → delete local.
//! Cleanup is best-effort and always attempted once the matching resource
//! exists, whatever the outcome of the later steps.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::Instrument;

use clipcoach_models::{FeedbackResult, Game, RemoteAsset, RequestId, UploadedClip};

use crate::config::CoachConfig;
use crate::error::{CoachError, CoachResult};
use crate::logging::RequestLogger;
use crate::poller::{await_ready, PollPolicy};
use crate::requester::request_feedback;
use crate::service::RemoteAssetService;
use crate::stager::{stage_clip, StagedClip};

/// Text plus bookkeeping from the remote part of a run.
struct RemoteOutcome {
    text: String,
    asset_name: String,
    polls: u32,
}

/// Runs feedback requests against a remote asset service.
#[derive(Clone)]
pub struct FeedbackPipeline {
    service: Arc<dyn RemoteAssetService>,
    policy: PollPolicy,
    work_dir: Option<PathBuf>,
    permits: Arc<Semaphore>,
}

impl FeedbackPipeline {
    pub fn new(service: Arc<dyn RemoteAssetService>, config: &CoachConfig) -> Self {
        Self {
            service,
            policy: config.poll_policy(),
            work_dir: config.work_dir.clone(),
            permits: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        }
    }

    /// Model identifier of the underlying service.
    pub fn model(&self) -> &str {
        self.service.model()
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Number of runs that could start right now without waiting.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Produce coaching feedback for `clip`.
    ///
    /// The run executes on its own task. Dropping the returned future, as
    /// happens when an HTTP client disconnects, leaves the run going so the
    /// remote asset and the staged file are still cleaned up.
    pub async fn run(
        &self,
        request_id: RequestId,
        clip: UploadedClip,
        game: Game,
    ) -> CoachResult<FeedbackResult> {
        let logger = RequestLogger::new(&request_id, game);
        let span = logger.create_span();
        let pipeline = self.clone();

        let task = tokio::spawn(
            async move { pipeline.run_logged(request_id, clip, game, logger).await }
                .instrument(span),
        );

        task.await
            .map_err(|e| CoachError::Internal(format!("feedback task ended abnormally: {}", e)))?
    }

    async fn run_logged(
        &self,
        request_id: RequestId,
        clip: UploadedClip,
        game: Game,
        logger: RequestLogger,
    ) -> CoachResult<FeedbackResult> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| CoachError::config("feedback pipeline is shut down"))?;

        let started = Instant::now();
        logger.log_start(&format!("{} ({} bytes)", clip.file_name, clip.len()));

        let staged = stage_clip(clip, self.work_dir.clone()).await?;
        let outcome = self.run_remote(&staged, game, &logger).await;
        staged.cleanup();

        match outcome {
            Ok(remote) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                logger.log_completion(&format!(
                    "{} chars after {} polls in {}ms",
                    remote.text.len(),
                    remote.polls,
                    elapsed_ms
                ));
                Ok(FeedbackResult {
                    request_id,
                    game,
                    model: self.service.model().to_string(),
                    text: remote.text,
                    asset_name: remote.asset_name,
                    polls: remote.polls,
                    elapsed_ms,
                })
            }
            Err(e) => {
                logger.log_error(&format!("{} ({})", e, e.kind()));
                Err(e)
            }
        }
    }

    /// Upload, wait, generate, then delete the remote asset.
    async fn run_remote(
        &self,
        staged: &StagedClip,
        game: Game,
        logger: &RequestLogger,
    ) -> CoachResult<RemoteOutcome> {
        let asset = self
            .service
            .upload(staged.path(), staged.mime_type(), staged.display_name())
            .await?;
        tracing::Span::current().record("asset", asset.name.as_str());
        logger.log_progress(&format!("uploaded as {} ({})", asset.name, asset.state));

        let asset_name = asset.name.clone();
        let result = self.feedback_for(asset, game, logger).await;
        self.delete_remote(&asset_name, logger).await;

        result.map(|(text, polls)| RemoteOutcome {
            text,
            asset_name,
            polls,
        })
    }

    async fn feedback_for(
        &self,
        asset: RemoteAsset,
        game: Game,
        logger: &RequestLogger,
    ) -> CoachResult<(String, u32)> {
        let ready = await_ready(self.service.as_ref(), asset, &self.policy).await?;
        logger.log_progress(&format!("asset ready after {} polls", ready.polls));

        let text = request_feedback(self.service.as_ref(), &ready.asset, game.instruction()).await?;
        Ok((text, ready.polls))
    }

    async fn delete_remote(&self, name: &str, logger: &RequestLogger) {
        if let Err(e) = self.service.delete(name).await {
            logger.log_warning(&format!("failed to delete remote asset {}: {}", name, e));
        }
    }
}
