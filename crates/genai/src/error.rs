/// Errors from the Gemini REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response envelope, or the raw body.
        message: String,
    },

    /// A successful response carried no image.
    #[error("No image in response: {reason}")]
    NoImage { reason: String },

    /// The returned image payload could not be decoded.
    #[error("Invalid image in response: {0}")]
    InvalidImage(String),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}
