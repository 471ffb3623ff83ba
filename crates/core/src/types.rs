//! Edit target, input method, and gender enumerations.
//!
//! These are the selectors the configuring step of a try-on session is
//! built from. Each has a stable lowercase string form used in preset
//! catalogs, logs, and on the command line.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Edit target
// ---------------------------------------------------------------------------

/// Which attribute of the subject a try-on replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditTarget {
    #[default]
    Clothing,
    Hair,
}

impl EditTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clothing => "clothing",
            Self::Hair => "hair",
        }
    }
}

impl FromStr for EditTarget {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clothing" => Ok(Self::Clothing),
            "hair" => Ok(Self::Hair),
            _ => Err(CoreError::Validation(format!(
                "Invalid edit target '{s}'. Must be one of: clothing, hair"
            ))),
        }
    }
}

impl fmt::Display for EditTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Input method
// ---------------------------------------------------------------------------

/// How the desired look is described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMethod {
    /// Pick an entry from the preset catalog.
    #[default]
    Preset,
    /// Upload a photo showing the desired garment or hairstyle.
    ReferenceImage,
    /// Type a description.
    FreeText,
}

impl InputMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preset => "preset",
            Self::ReferenceImage => "reference_image",
            Self::FreeText => "free_text",
        }
    }
}

impl FromStr for InputMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preset" => Ok(Self::Preset),
            "reference_image" => Ok(Self::ReferenceImage),
            "free_text" => Ok(Self::FreeText),
            _ => Err(CoreError::Validation(format!(
                "Invalid input method '{s}'. Must be one of: preset, reference_image, free_text"
            ))),
        }
    }
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// Audience a preset is curated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Unisex,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unisex => "unisex",
        }
    }

    /// Whether presets can be filtered by this value. Unisex presets are
    /// listed under either filter, so `Unisex` itself is not one.
    pub fn is_filter(self) -> bool {
        !matches!(self, Self::Unisex)
    }
}

impl FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "unisex" => Ok(Self::Unisex),
            _ => Err(CoreError::Validation(format!(
                "Invalid gender '{s}'. Must be one of: male, female, unisex"
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
