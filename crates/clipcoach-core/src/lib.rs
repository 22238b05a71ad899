//! Coaching pipeline for ClipCoach.
//!
//! This crate sequences one feedback request end to end:
//! stage the clip, upload it, wait for the remote asset to become ready,
//! request feedback, then clean up the remote asset and the temp file.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod poller;
pub mod requester;
pub mod service;
pub mod stager;

pub use config::{CoachConfig, MIN_POLL_INTERVAL};
pub use error::{CoachError, CoachResult};
pub use logging::RequestLogger;
pub use pipeline::FeedbackPipeline;
pub use poller::{await_ready, PollOutcome, PollPolicy};
pub use requester::request_feedback;
pub use service::RemoteAssetService;
pub use stager::{stage_clip, StagedClip};

#[cfg(test)]
pub(crate) mod testing;
