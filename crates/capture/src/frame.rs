//! Rendering captured frames into encoded still images.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{imageops, DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use mirror_core::image::StillImage;

use crate::device::{Facing, RawFrame};
use crate::error::CaptureError;

/// Default JPEG quality for captured stills.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoding used for captured stills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StillEncoding {
    Jpeg { quality: u8 },
    Png,
}

impl Default for StillEncoding {
    fn default() -> Self {
        Self::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Tunables for the capture manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureConfig {
    pub encoding: StillEncoding,
}

/// Copy a raw frame into an image buffer of the frame's size.
///
/// Front-facing frames are mirrored horizontally so the still matches
/// the mirrored preview the user framed the shot with.
pub fn render_still(frame: RawFrame, facing: Facing) -> Result<RgbaImage, CaptureError> {
    let RawFrame {
        width,
        height,
        rgba,
    } = frame;
    let mut buffer =
        RgbaImage::from_raw(width, height, rgba).ok_or(CaptureError::InvalidFrame { width, height })?;
    if facing.is_mirrored() {
        imageops::flip_horizontal_in_place(&mut buffer);
    }
    Ok(buffer)
}

/// Encode a rendered buffer.
pub fn encode_still(buffer: &RgbaImage, encoding: StillEncoding) -> Result<StillImage, CaptureError> {
    let (width, height) = buffer.dimensions();
    let mut out = Vec::new();

    let mime = match encoding {
        StillEncoding::Jpeg { quality } => {
            // JPEG has no alpha channel.
            let rgb = DynamicImage::ImageRgba8(buffer.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| CaptureError::Encode(e.to_string()))?;
            "image/jpeg"
        }
        StillEncoding::Png => {
            PngEncoder::new(&mut out)
                .write_image(buffer.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| CaptureError::Encode(e.to_string()))?;
            "image/png"
        }
    };

    StillImage::new(mime, out).map_err(|e| CaptureError::Encode(e.to_string()))
}

/// Render and encode in one step.
pub fn frame_to_still(
    frame: RawFrame,
    facing: Facing,
    encoding: StillEncoding,
) -> Result<StillImage, CaptureError> {
    let buffer = render_still(frame, facing)?;
    encode_still(&buffer, encoding)
}
