//! Media device capability boundary.
//!
//! The capture manager never touches hardware directly. A
//! [`MediaDeviceProvider`] opens [`LiveStream`]s for a requested facing
//! mode; browsers, native camera stacks, and test fakes all plug in
//! here.

use async_trait::async_trait;

/// Which physical camera is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// User-facing (selfie) camera. Previewed mirrored.
    #[default]
    Front,
    /// Environment-facing camera.
    Back,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }

    /// Whether the live preview for this facing is horizontally mirrored.
    pub fn is_mirrored(self) -> bool {
        matches!(self, Self::Front)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

/// Ideal capture width requested from the device.
pub const IDEAL_WIDTH: u32 = 1920;

/// Ideal capture height requested from the device.
pub const IDEAL_HEIGHT: u32 = 1080;

/// What the manager asks the provider for. Video only, no audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub facing: Facing,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl StreamConstraints {
    pub fn for_facing(facing: Facing) -> Self {
        Self {
            facing,
            ideal_width: IDEAL_WIDTH,
            ideal_height: IDEAL_HEIGHT,
        }
    }
}

/// One video frame as tightly packed RGBA8 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Failures reported by a media device provider or stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),

    #[error("No camera device available")]
    NoDevice,

    #[error("Camera access requires a secure context")]
    InsecureContext,

    #[error("Stream has ended")]
    StreamEnded,

    #[error("Device error: {0}")]
    Other(String),
}

/// A live camera stream.
#[async_trait]
pub trait LiveStream: Send + Sync {
    /// Read back the frame currently shown in the preview.
    async fn read_frame(&self) -> Result<RawFrame, DeviceError>;

    /// Stop every track of the stream and release the device.
    fn stop(&self);
}

/// Opens camera streams.
#[async_trait]
pub trait MediaDeviceProvider: Send + Sync {
    async fn open(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn LiveStream>, DeviceError>;
}
