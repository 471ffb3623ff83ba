use crate::device::DeviceError;

/// Errors from the capture manager.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Opening a stream failed (permission, missing device, insecure
    /// context). Callers fall back to file-based acquisition.
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(#[source] DeviceError),

    /// The operation requires an active capture session.
    #[error("Capture session is not active")]
    NotActive,

    /// A close or switch happened while this open was in flight; the
    /// late stream was stopped immediately.
    #[error("Camera request superseded by a later close or switch")]
    Superseded,

    /// Reading a frame from a still-live stream failed.
    #[error("Frame read failed: {0}")]
    Frame(#[source] DeviceError),

    /// The frame buffer length does not match its dimensions.
    #[error("Frame buffer does not match {width}x{height} RGBA")]
    InvalidFrame { width: u32, height: u32 },

    #[error("Failed to encode still image: {0}")]
    Encode(String),
}
