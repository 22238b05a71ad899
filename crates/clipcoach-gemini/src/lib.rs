//! Gemini client for ClipCoach.
//!
//! Wraps the parts of the Generative Language API the coach needs:
//! - Resumable uploads to the File API
//! - File state lookup and deletion
//! - `generateContent` with a file reference and a text instruction

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::GeminiClient;
pub use config::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{GeminiError, GeminiResult};
