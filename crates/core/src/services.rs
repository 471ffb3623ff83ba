//! Collaborator boundaries driven by the try-on workflow.
//!
//! The workflow never talks to a model or a share surface directly; it
//! calls these traits. `mirror-genai` provides the HTTP-backed
//! implementations, tests provide scripted fakes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::image::StillImage;
use crate::types::EditTarget;

/// Failure reported by a collaborator, carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
    message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Payload handed to the generation collaborator.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Correlates log lines for one attempt.
    pub request_id: Uuid,
    pub subject_image: StillImage,
    /// Present only when the look was described by a reference photo.
    pub reference_image: Option<StillImage>,
    pub target: EditTarget,
    pub prompt_text: String,
}

/// Produces a text description of the garment or hairstyle in an image.
#[async_trait]
pub trait DescriptionService: Send + Sync {
    async fn describe(
        &self,
        image: &StillImage,
        target: EditTarget,
    ) -> Result<String, ServiceError>;
}

/// Edits the subject image so the targeted attribute matches the prompt,
/// preserving facial identity and body pose.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<StillImage, ServiceError>;
}

/// Where a share/export request ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Handed to a native share surface.
    Shared,
    /// Fell back to saving a file at `location`.
    Downloaded { location: String },
}

/// Final-image share surface with a download fallback.
#[async_trait]
pub trait ShareSink: Send + Sync {
    async fn share(&self, image: &StillImage) -> Result<ShareOutcome, ServiceError>;
}
