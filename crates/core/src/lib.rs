//! Domain types shared by every MirrorAI crate.
//!
//! Holds the still-image value, the edit target / input method enums,
//! the static preset catalog, and the collaborator traits that the
//! workflow drives (description, generation, share/export). This crate
//! has no internal dependencies.

pub mod error;
pub mod image;
pub mod preset;
pub mod services;
pub mod types;
