//! [`GeminiApi`] as the workflow's description and generation collaborator.

use async_trait::async_trait;
use mirror_core::image::StillImage;
use mirror_core::services::{
    DescriptionService, GenerationRequest, GenerationService, ServiceError,
};
use mirror_core::types::EditTarget;

use crate::api::GeminiApi;
use crate::error::GenAiError;

impl From<GenAiError> for ServiceError {
    fn from(err: GenAiError) -> Self {
        ServiceError::new(err.to_string())
    }
}

#[async_trait]
impl DescriptionService for GeminiApi {
    async fn describe(
        &self,
        image: &StillImage,
        target: EditTarget,
    ) -> Result<String, ServiceError> {
        Ok(self.describe_image(image, target).await?)
    }
}

#[async_trait]
impl GenerationService for GeminiApi {
    async fn generate(&self, request: &GenerationRequest) -> Result<StillImage, ServiceError> {
        Ok(self.edit_image(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genai_error_maps_to_service_message() {
        let err: ServiceError = GenAiError::NoImage {
            reason: "prompt blocked (SAFETY)".into(),
        }
        .into();
        assert_eq!(err.message(), "No image in response: prompt blocked (SAFETY)");
    }
}
