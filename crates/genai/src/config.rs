use std::fmt;

use crate::error::GenAiError;

/// Default REST base URL.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for reference-image description.
pub const DEFAULT_DESCRIBE_MODEL: &str = "gemini-2.5-flash";

/// Default model for image editing.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Default HTTP timeout. Image edits routinely take tens of seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini client configuration.
#[derive(Clone)]
pub struct GenAiConfig {
    pub api_key: String,
    /// Base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub api_url: String,
    pub describe_model: String,
    pub image_model: String,
    pub timeout_secs: u64,
}

impl GenAiConfig {
    /// Configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.into(),
            describe_model: DEFAULT_DESCRIBE_MODEL.into(),
            image_model: DEFAULT_IMAGE_MODEL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                            |
    /// |-------------------------|----------------------------------------------------|
    /// | `GEMINI_API_KEY`        | falls back to `API_KEY`; one of them is required   |
    /// | `GEMINI_API_URL`        | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `GEMINI_DESCRIBE_MODEL` | `gemini-2.5-flash`                                 |
    /// | `GEMINI_IMAGE_MODEL`    | `gemini-2.5-flash-image`                           |
    /// | `GEMINI_TIMEOUT_SECS`   | `120`                                              |
    pub fn from_env() -> Result<Self, GenAiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GenAiError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("GEMINI_API_KEY")
            .or_else(|| non_empty("API_KEY"))
            .ok_or_else(|| GenAiError::Config("GEMINI_API_KEY (or API_KEY) must be set".into()))?;

        let mut config = Self::new(api_key.trim());

        if let Some(url) = non_empty("GEMINI_API_URL") {
            config.api_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = non_empty("GEMINI_DESCRIBE_MODEL") {
            config.describe_model = model.trim().to_string();
        }
        if let Some(model) = non_empty("GEMINI_IMAGE_MODEL") {
            config.image_model = model.trim().to_string();
        }
        if let Some(secs) = non_empty("GEMINI_TIMEOUT_SECS") {
            config.timeout_secs = secs.trim().parse().map_err(|_| {
                GenAiError::Config(format!("GEMINI_TIMEOUT_SECS must be a valid u64, got '{secs}'"))
            })?;
        }

        Ok(config)
    }
}

impl fmt::Debug for GenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenAiConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("describe_model", &self.describe_model)
            .field("image_model", &self.image_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_set() {
        let config = GenAiConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.describe_model, DEFAULT_DESCRIBE_MODEL);
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn api_key_falls_back() {
        let config = GenAiConfig::from_lookup(lookup(&[("API_KEY", "legacy")])).unwrap();
        assert_eq!(config.api_key, "legacy");
    }

    #[test]
    fn missing_key_is_config_error() {
        let result = GenAiConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")]));
        assert_matches!(result, Err(GenAiError::Config(_)));
    }

    #[test]
    fn overrides_are_trimmed() {
        let config = GenAiConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_API_URL", "http://localhost:9000/"),
            ("GEMINI_IMAGE_MODEL", " custom-image "),
            ("GEMINI_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:9000");
        assert_eq!(config.image_model, "custom-image");
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn bad_timeout_rejected() {
        let result = GenAiConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_TIMEOUT_SECS", "soon"),
        ]));
        assert_matches!(result, Err(GenAiError::Config(_)));
    }

    #[test]
    fn debug_redacts_key() {
        let config = GenAiConfig::new("secret-key");
        assert!(!format!("{config:?}").contains("secret-key"));
    }
}
