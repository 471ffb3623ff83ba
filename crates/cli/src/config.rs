use std::path::PathBuf;

use anyhow::Context;
use mirror_core::preset::PresetCatalog;

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory exported results are written to (default: `.`).
    pub output_dir: PathBuf,
    /// JSON file replacing the built-in preset catalog.
    pub presets_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default            |
    /// |-----------------------|--------------------|
    /// | `MIRROR_OUTPUT_DIR`   | `.`                |
    /// | `MIRROR_PRESETS_FILE` | built-in catalog   |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            output_dir: non_empty("MIRROR_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            presets_file: non_empty("MIRROR_PRESETS_FILE").map(PathBuf::from),
        }
    }

    /// The configured preset catalog.
    pub async fn load_catalog(&self) -> anyhow::Result<PresetCatalog> {
        let Some(path) = &self.presets_file else {
            return Ok(PresetCatalog::builtin()?);
        };
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading preset catalog {}", path.display()))?;
        let catalog = PresetCatalog::from_json(&json)
            .with_context(|| format!("parsing preset catalog {}", path.display()))?;
        tracing::info!(path = %path.display(), presets = catalog.len(), "Loaded preset catalog");
        Ok(catalog)
    }
}
