//! Shared data models for ClipCoach.
//!
//! This crate provides Serde-serializable types for:
//! - Supported games and their coaching instructions
//! - Uploaded clips and accepted container formats
//! - Remote asset handles and readiness states
//! - Feedback results

pub mod asset;
pub mod clip;
pub mod feedback;
pub mod game;

// Re-export common types
pub use asset::{AssetState, ReadyAsset, RemoteAsset};
pub use clip::{ClipExtension, UnsupportedFormatError, UploadedClip};
pub use feedback::{FeedbackResult, RequestId};
pub use game::{lookup, Game, GameOption, UnknownGameError};
