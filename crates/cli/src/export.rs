//! Download fallback for sharing a result: write it to a directory.

use std::path::PathBuf;

use async_trait::async_trait;
use mirror_core::image::StillImage;
use mirror_core::services::{ServiceError, ShareOutcome, ShareSink};

/// File name prefix for exported results.
pub const EXPORT_PREFIX: &str = "mirror-ai";

/// Writes shared images as `mirror-ai-<unix-millis>.<ext>`.
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target path for an export made at `millis`.
    pub fn export_path(&self, image: &StillImage, millis: i64) -> PathBuf {
        self.dir
            .join(format!("{EXPORT_PREFIX}-{millis}.{}", image.extension()))
    }
}

#[async_trait]
impl ShareSink for FileExportSink {
    async fn share(&self, image: &StillImage) -> Result<ShareOutcome, ServiceError> {
        let path = self.export_path(image, chrono::Utc::now().timestamp_millis());

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ServiceError::new(format!("creating {}: {e}", self.dir.display())))?;
        tokio::fs::write(&path, image.bytes())
            .await
            .map_err(|e| ServiceError::new(format!("writing {}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), bytes = image.len(), "Result exported");
        Ok(ShareOutcome::Downloaded {
            location: path.display().to_string(),
        })
    }
}
