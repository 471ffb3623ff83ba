//! Gemini REST client for the try-on collaborators.
//!
//! Provides typed `generateContent` request/response messages, prompt
//! assembly for image description and image editing, environment
//! configuration, and a [`api::GeminiApi`] that implements the
//! description and generation service traits from `mirror-core`.

pub mod api;
pub mod config;
pub mod error;
pub mod messages;
pub mod prompt;
pub mod service;
