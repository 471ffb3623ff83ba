//! Self-contained encoded still images.
//!
//! A [`StillImage`] is an encoded raster (JPEG, PNG, WebP, ...) tagged
//! with its MIME type. It is the single currency for subject photos,
//! reference photos, and generation results: it can be sent inline to
//! the generation service and rendered directly as a preview via its
//! data-URL form.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::CoreError;

/// MIME prefix every accepted still image must carry.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Returns `true` when `mime` names an image type (`image/*`).
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with(IMAGE_MIME_PREFIX)
}

/// An encoded still image plus its MIME type.
///
/// Cloning is cheap: the encoded bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct StillImage {
    mime: String,
    bytes: Arc<[u8]>,
}

impl StillImage {
    /// Wrap already-encoded bytes.
    ///
    /// Fails when `mime` is not an `image/*` type or `bytes` is empty.
    pub fn new(mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Result<Self, CoreError> {
        let mime = mime.into().trim().to_ascii_lowercase();
        if !is_image_mime(&mime) {
            return Err(CoreError::Validation(format!(
                "Not an image MIME type: '{mime}'"
            )));
        }
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(CoreError::Validation("Image data must not be empty".into()));
        }
        Ok(Self { mime, bytes })
    }

    /// Parse a `data:image/...;base64,...` URL.
    pub fn from_data_url(url: &str) -> Result<Self, CoreError> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| CoreError::Validation("Data URL must start with 'data:'".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| CoreError::Validation("Data URL is missing its payload".into()))?;

        let mut params = header.split(';');
        let mime = params.next().unwrap_or_default();
        if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
            return Err(CoreError::Validation(
                "Only base64-encoded data URLs are supported".into(),
            ));
        }

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| CoreError::Validation(format!("Invalid base64 image payload: {e}")))?;
        Self::new(mime, bytes)
    }

    /// Decode a bare base64 payload with a known MIME type.
    pub fn from_base64(mime: impl Into<String>, payload: &str) -> Result<Self, CoreError> {
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| CoreError::Validation(format!("Invalid base64 image payload: {e}")))?;
        Self::new(mime, bytes)
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 payload without any data-URL header, as inline APIs expect.
    pub fn base64_payload(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<payload>` form, directly renderable as a preview.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.base64_payload())
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "image/bmp" => "bmp",
            _ => "img",
        }
    }
}

impl fmt::Debug for StillImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StillImage")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}
