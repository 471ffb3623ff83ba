//! Image input aggregation.
//!
//! Files from a picker, dropped files, clipboard pastes, and captured
//! camera frames all end up as one [`StillImage`]. Inputs that are not
//! images are ignored without an error: [`acquire`] returns `Ok(None)`
//! and the caller leaves its state untouched.

use std::path::{Path, PathBuf};

use mirror_core::image::{is_image_mime, StillImage};

/// Where the bytes of a file live.
#[derive(Debug, Clone)]
pub enum FileContent {
    /// Read asynchronously when acquired.
    Path(PathBuf),
    /// Already in memory.
    Bytes(Vec<u8>),
}

/// A user-supplied file.
#[derive(Debug, Clone)]
pub struct FileItem {
    pub name: String,
    /// MIME type announced by the picker or drop source. When absent the
    /// type is sniffed from the content.
    pub declared_mime: Option<String>,
    pub content: FileContent,
}

impl FileItem {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            declared_mime: None,
            content: FileContent::Path(path.to_path_buf()),
        }
    }

    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_mime: Some(mime.into()),
            content: FileContent::Bytes(bytes),
        }
    }
}

/// One entry of a clipboard paste.
#[derive(Debug, Clone)]
pub struct ClipboardItem {
    pub mime: String,
    pub data: Vec<u8>,
}

/// An acquisition channel plus its payload.
#[derive(Debug, Clone)]
pub enum ImageSource {
    SelectedFile(FileItem),
    DroppedFile(FileItem),
    /// All items of one paste; only the first image among them is used.
    Pasted(Vec<ClipboardItem>),
    CapturedFrame(StillImage),
}

impl ImageSource {
    fn kind(&self) -> &'static str {
        match self {
            Self::SelectedFile(_) => "selected_file",
            Self::DroppedFile(_) => "dropped_file",
            Self::Pasted(_) => "clipboard",
            Self::CapturedFrame(_) => "camera",
        }
    }
}

/// Errors that prevent reading an input at all.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to read '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Normalize an input into a still image.
///
/// Returns `Ok(None)` for non-image input.
pub async fn acquire(source: ImageSource) -> Result<Option<StillImage>, InputError> {
    let kind = source.kind();
    let image = match source {
        ImageSource::SelectedFile(file) | ImageSource::DroppedFile(file) => read_file(file).await?,
        ImageSource::Pasted(items) => first_pasted_image(items),
        ImageSource::CapturedFrame(still) => Some(still),
    };

    match &image {
        Some(still) => tracing::debug!(
            source = kind,
            mime = still.mime(),
            bytes = still.len(),
            "Image acquired",
        ),
        None => tracing::debug!(source = kind, "Ignoring non-image input"),
    }
    Ok(image)
}

// ---- private helpers ----

async fn read_file(file: FileItem) -> Result<Option<StillImage>, InputError> {
    if let Some(mime) = &file.declared_mime {
        if !is_image_mime(mime) {
            return Ok(None);
        }
    }

    let bytes = match file.content {
        FileContent::Bytes(bytes) => bytes,
        FileContent::Path(path) => tokio::fs::read(&path).await.map_err(|source| InputError::Read {
            name: file.name.clone(),
            source,
        })?,
    };

    let mime = match file.declared_mime {
        Some(mime) => mime,
        None => match sniff_mime(&bytes) {
            Some(mime) => mime.to_string(),
            None => return Ok(None),
        },
    };

    Ok(StillImage::new(mime, bytes).ok())
}

fn first_pasted_image(items: Vec<ClipboardItem>) -> Option<StillImage> {
    items
        .into_iter()
        .find(|item| is_image_mime(&item.mime))
        .and_then(|item| StillImage::new(item.mime, item.data).ok())
}

/// Guess an image MIME type from magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|format| format.to_mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n', 0, 0, 0, 13];

    #[test]
    fn sniffs_png_and_rejects_text() {
        assert_eq!(sniff_mime(PNG_MAGIC), Some("image/png"));
        assert_eq!(sniff_mime(b"hello world"), None);
    }

    #[tokio::test]
    async fn declared_non_image_is_ignored() {
        let file = FileItem::from_bytes("notes.txt", "text/plain", b"hi".to_vec());
        let result = acquire(ImageSource::SelectedFile(file)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn declared_image_bytes_are_accepted() {
        let file = FileItem::from_bytes("a.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff]);
        let still = acquire(ImageSource::DroppedFile(file)).await.unwrap().unwrap();
        assert_eq!(still.mime(), "image/jpeg");
        assert_eq!(still.bytes(), &[0xff, 0xd8, 0xff]);
    }

    #[tokio::test]
    async fn first_image_in_paste_wins() {
        let items = vec![
            ClipboardItem {
                mime: "text/html".into(),
                data: b"<b>x</b>".to_vec(),
            },
            ClipboardItem {
                mime: "image/png".into(),
                data: vec![1],
            },
            ClipboardItem {
                mime: "image/jpeg".into(),
                data: vec![2],
            },
        ];
        let still = acquire(ImageSource::Pasted(items)).await.unwrap().unwrap();
        assert_eq!(still.mime(), "image/png");
        assert_eq!(still.bytes(), &[1]);
    }

    #[tokio::test]
    async fn paste_without_image_is_ignored() {
        let items = vec![ClipboardItem {
            mime: "text/plain".into(),
            data: b"just text".to_vec(),
        }];
        assert!(acquire(ImageSource::Pasted(items)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn captured_frame_passes_through() {
        let still = StillImage::new("image/jpeg", vec![9u8, 9]).unwrap();
        let got = acquire(ImageSource::CapturedFrame(still.clone()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, still);
    }

    #[tokio::test]
    async fn path_is_read_and_sniffed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo");
        std::fs::write(&path, PNG_MAGIC).unwrap();

        let still = acquire(ImageSource::SelectedFile(FileItem::from_path(&path)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(still.mime(), "image/png");
    }

    #[tokio::test]
    async fn unreadable_path_reports_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = FileItem::from_path(dir.path().join("missing.png"));
        let err = acquire(ImageSource::SelectedFile(file)).await.unwrap_err();
        assert!(matches!(err, InputError::Read { ref name, .. } if name == "missing.png"));
    }
}
