//! REST API client for Gemini `generateContent`.
//!
//! Wraps the two calls the try-on flow needs (describe a reference
//! image, edit the subject image) using [`reqwest`].

use std::time::Duration;

use mirror_core::image::StillImage;
use mirror_core::services::GenerationRequest;
use mirror_core::types::EditTarget;

use crate::config::GenAiConfig;
use crate::error::GenAiError;
use crate::messages::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use crate::prompt::{build_describe_request, build_edit_request};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for the Gemini API.
pub struct GeminiApi {
    client: reqwest::Client,
    config: GenAiConfig,
}

impl GeminiApi {
    /// Create a client with its own connection pool and the configured
    /// request timeout.
    pub fn new(config: GenAiConfig) -> Result<Self, GenAiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Describe the garment or hairstyle shown in `image`.
    ///
    /// An empty string is a valid answer.
    pub async fn describe_image(
        &self,
        image: &StillImage,
        target: EditTarget,
    ) -> Result<String, GenAiError> {
        let request = build_describe_request(image, target);
        let response = self
            .generate_content(&self.config.describe_model, &request)
            .await?;
        let text = response.text().trim().to_string();

        tracing::debug!(edit_target = %target, chars = text.chars().count(), "Reference image described");
        Ok(text)
    }

    /// Edit the subject image per `request` and return the result.
    pub async fn edit_image(&self, request: &GenerationRequest) -> Result<StillImage, GenAiError> {
        let body = build_edit_request(request);
        let response = self.generate_content(&self.config.image_model, &body).await?;

        let Some(data) = response.first_inline_data() else {
            return Err(GenAiError::NoImage {
                reason: response.missing_image_reason(),
            });
        };
        let image = StillImage::from_base64(data.mime_type.as_str(), &data.data)
            .map_err(|e| GenAiError::InvalidImage(e.to_string()))?;

        tracing::info!(
            request_id = %request.request_id,
            edit_target = %request.target,
            mime = image.mime(),
            bytes = image.len(),
            "Edited image received",
        );
        Ok(image)
    }

    /// Send a raw `generateContent` request to `model`.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn endpoint(&self, model: &str) -> String {
        generate_content_url(&self.config.api_url, model)
    }

    /// Ensure the response has a success status code. On failure the
    /// error envelope's message is extracted when present, otherwise
    /// the raw body is kept.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GenAiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenAiError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GenAiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// `{base}/models/{model}:generateContent`
pub fn generate_content_url(api_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        api_url.trim_end_matches('/'),
        model
    )
}

/// Human-readable message from an error response body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "<empty body>".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
