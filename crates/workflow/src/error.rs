use mirror_core::services::ServiceError;
use mirror_core::types::{EditTarget, Gender, InputMethod};

use crate::session::Step;

/// Rejected workflow transitions and share failures.
///
/// Generation failures are not errors at this level: they are recorded
/// on the session as `last_error` and the session returns to
/// configuring.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Cannot {action} while in step '{step}'")]
    InvalidTransition { action: &'static str, step: Step },

    #[error("The subject photo can only be changed before configuring")]
    SubjectImageLocked,

    #[error("Cannot generate yet: {0}")]
    Incomplete(&'static str),

    #[error("A reference image description is still in progress")]
    DescriptionPending,

    #[error("Input method is '{actual}', expected '{expected}'")]
    WrongInputMethod {
        expected: InputMethod,
        actual: InputMethod,
    },

    #[error("Presets can only be filtered by male or female, not '{0}'")]
    InvalidGenderFilter(Gender),

    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("Preset '{id}' is a {category} preset but the edit target is {target}")]
    PresetTargetMismatch {
        id: String,
        category: EditTarget,
        target: EditTarget,
    },

    #[error("Generation result arrived after the session moved on")]
    Superseded,

    #[error("No result image to share")]
    NoResult,

    #[error("Share failed: {0}")]
    Share(#[source] ServiceError),
}
