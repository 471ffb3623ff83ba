//! Static preset catalog and catalog validation.
//!
//! A preset is a curated clothing or hairstyle target: a thumbnail plus
//! a canonical description that becomes the generation prompt when the
//! preset is chosen. The catalog is read-only for the lifetime of the
//! process; the built-in entries ship embedded in the binary and a JSON
//! file with the same shape can replace them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EditTarget, Gender};

/* --------------------------------------------------------------------------
   Validation limits
   -------------------------------------------------------------------------- */

/// Maximum length for a preset id.
pub const MAX_PRESET_ID_LEN: usize = 64;

/// Maximum length for a preset display name.
pub const MAX_PRESET_NAME_LEN: usize = 200;

/// Maximum length for a canonical description.
pub const MAX_DESCRIPTION_LEN: usize = 5000;

const BUILTIN_CATALOG_JSON: &str = include_str!("../data/presets.json");

/* --------------------------------------------------------------------------
   Catalog entry
   -------------------------------------------------------------------------- */

/// One selectable clothing or hairstyle target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetItem {
    pub id: String,
    pub display_name: String,
    pub category: EditTarget,
    pub gender: Gender,
    /// Thumbnail location (URL or path); opaque to this crate.
    pub thumbnail_ref: String,
    /// Prompt text used when this preset is selected.
    pub canonical_description: String,
}

impl PresetItem {
    /// Whether this entry is shown under the given gender filter.
    ///
    /// Unisex entries are visible under every filter.
    pub fn visible_to(&self, gender: Gender) -> bool {
        self.gender == gender || self.gender == Gender::Unisex
    }
}

/* --------------------------------------------------------------------------
   Validation functions
   -------------------------------------------------------------------------- */

/// Validate a preset id: non-empty, bounded, no whitespace.
pub fn validate_preset_id(id: &str) -> Result<(), CoreError> {
    if id.is_empty() {
        return Err(CoreError::Validation("Preset id must not be empty".into()));
    }
    if id.len() > MAX_PRESET_ID_LEN {
        return Err(CoreError::Validation(format!(
            "Preset id too long: {} chars (max {MAX_PRESET_ID_LEN})",
            id.len()
        )));
    }
    if id.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(format!(
            "Preset id '{id}' must not contain whitespace"
        )));
    }
    Ok(())
}

/// Validate a preset display name: non-empty and within length limit.
pub fn validate_preset_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Preset name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_PRESET_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Preset name too long: {} chars (max {MAX_PRESET_NAME_LEN})",
            name.len()
        )));
    }
    Ok(())
}

/// Validate a canonical description: non-empty and within length limit.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Preset description must not be empty".to_string(),
        ));
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Preset description too long: {} chars (max {MAX_DESCRIPTION_LEN})",
            description.len()
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
   Catalog
   -------------------------------------------------------------------------- */

/// Ordered, immutable collection of presets.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    entries: Vec<PresetItem>,
}

impl PresetCatalog {
    /// Build a catalog, validating every entry and rejecting duplicate ids.
    pub fn new(entries: Vec<PresetItem>) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for item in &entries {
            validate_preset_id(&item.id)?;
            validate_preset_name(&item.display_name)?;
            validate_description(&item.canonical_description)?;
            if !seen.insert(item.id.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Duplicate preset id '{}'",
                    item.id
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Parse and validate a JSON array of presets.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let entries: Vec<PresetItem> = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid preset catalog JSON: {e}")))?;
        Self::new(entries)
    }

    /// The catalog shipped with the application.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::from_json(BUILTIN_CATALOG_JSON)
    }

    pub fn entries(&self) -> &[PresetItem] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a preset by id.
    pub fn get(&self, id: &str) -> Option<&PresetItem> {
        self.entries.iter().find(|p| p.id == id)
    }

    /// Presets of one category visible under a gender filter, in catalog order.
    pub fn filter(
        &self,
        category: EditTarget,
        gender: Gender,
    ) -> impl Iterator<Item = &PresetItem> + '_ {
        self.entries
            .iter()
            .filter(move |p| p.category == category && p.visible_to(gender))
    }
}
