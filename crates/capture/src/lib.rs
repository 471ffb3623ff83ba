//! Camera capture and image acquisition.
//!
//! [`manager::CaptureManager`] owns the live camera stream lifecycle
//! behind an injected [`device::MediaDeviceProvider`], and
//! [`input::acquire`] normalizes files, drops, clipboard pastes, and
//! captured frames into a single [`mirror_core::image::StillImage`].

pub mod device;
pub mod error;
pub mod frame;
pub mod input;
pub mod manager;
