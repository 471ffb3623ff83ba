//! The try-on session state machine.
//!
//! ```text
//! AwaitingSubjectPhoto -> Configuring -> Processing -> ResultReady
//!          ^                 |  ^            |            |
//!          +---- back -------+  +-- failure -+            |
//!                               +------- try again -------+
//! any step -> AwaitingSubjectPhoto on reset
//! ```
//!
//! Every mutation goes through a named transition that validates the
//! current step first. The session is plain data: it never awaits, so
//! callers can hold it behind a lock and release the lock before
//! talking to a collaborator.

use std::fmt;

use mirror_core::image::StillImage;
use mirror_core::preset::{PresetCatalog, PresetItem};
use mirror_core::services::{GenerationRequest, ServiceError};
use mirror_core::types::{EditTarget, Gender, InputMethod};
use serde::Serialize;
use uuid::Uuid;

use crate::error::WorkflowError;

/// Shown when the generation collaborator fails without a message.
pub const GENERATION_FAILED_FALLBACK: &str = "Generation failed, please try again.";

/// Preset gender filter a fresh session starts with.
pub const DEFAULT_GENDER_FILTER: Gender = Gender::Female;

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// Workflow step, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    AwaitingSubjectPhoto,
    Configuring,
    Processing,
    ResultReady,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingSubjectPhoto => "awaiting_subject_photo",
            Self::Configuring => "configuring",
            Self::Processing => "processing",
            Self::ResultReady => "result_ready",
        }
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::AwaitingSubjectPhoto => "Upload Photo",
            Self::Configuring => "Choose Look",
            Self::Processing => "Generating",
            Self::ResultReady => "Result",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tickets and previews
// ---------------------------------------------------------------------------

/// Handle for one auto-description request.
///
/// Issued when a reference image is accepted. Only the ticket with the
/// latest sequence number may write its result back; anything older is
/// discarded.
#[derive(Debug, Clone)]
pub struct DescriptionTicket {
    seq: u64,
    image: StillImage,
    target: EditTarget,
}

impl DescriptionTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn image(&self) -> &StillImage {
        &self.image
    }

    pub fn target(&self) -> EditTarget {
        self.target
    }
}

/// What to show beside the generated result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPreview {
    /// The user's own reference photo.
    ReferenceImage(StillImage),
    /// Thumbnail location of the chosen preset.
    PresetThumbnail(String),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Client state for one try-on attempt.
#[derive(Debug, Clone, Default)]
pub struct Session {
    step: Step,
    subject_image: Option<StillImage>,
    edit_target: EditTarget,
    input_method: InputMethod,
    reference_image: Option<StillImage>,
    free_text_description: String,
    selected_preset_id: Option<String>,
    description_pending: bool,
    /// Sequence number of the newest description ticket. Never reset.
    description_seq: u64,
    gender_filter: Option<Gender>,
    /// Request id of the outstanding generation, if any.
    generation_id: Option<Uuid>,
    result_image: Option<StillImage>,
    last_error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /* ---- accessors ---- */

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn subject_image(&self) -> Option<&StillImage> {
        self.subject_image.as_ref()
    }

    pub fn edit_target(&self) -> EditTarget {
        self.edit_target
    }

    pub fn input_method(&self) -> InputMethod {
        self.input_method
    }

    pub fn reference_image(&self) -> Option<&StillImage> {
        self.reference_image.as_ref()
    }

    pub fn free_text_description(&self) -> &str {
        &self.free_text_description
    }

    pub fn selected_preset_id(&self) -> Option<&str> {
        self.selected_preset_id.as_deref()
    }

    pub fn description_pending(&self) -> bool {
        self.description_pending
    }

    pub fn gender_filter(&self) -> Gender {
        self.gender_filter.unwrap_or(DEFAULT_GENDER_FILTER)
    }

    pub fn result_image(&self) -> Option<&StillImage> {
        self.result_image.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the free-text field currently accepts edits.
    pub fn text_editable(&self) -> bool {
        !self.description_pending
    }

    /// Presets offered for the current edit target and gender filter.
    pub fn visible_presets<'a>(&self, catalog: &'a PresetCatalog) -> Vec<&'a PresetItem> {
        catalog
            .filter(self.edit_target, self.gender_filter())
            .collect()
    }

    /// The image or thumbnail shown beside the result.
    pub fn result_preview(&self, catalog: &PresetCatalog) -> Option<ResultPreview> {
        match self.input_method {
            InputMethod::ReferenceImage => self
                .reference_image
                .clone()
                .map(ResultPreview::ReferenceImage),
            InputMethod::Preset => self
                .selected_preset_id
                .as_deref()
                .and_then(|id| catalog.get(id))
                .map(|p| ResultPreview::PresetThumbnail(p.thumbnail_ref.clone())),
            InputMethod::FreeText => None,
        }
    }

    /* ---- subject photo ---- */

    /// Set or replace the subject photo.
    pub fn set_subject_image(&mut self, image: StillImage) -> Result<(), WorkflowError> {
        if self.step != Step::AwaitingSubjectPhoto {
            return Err(WorkflowError::SubjectImageLocked);
        }
        self.subject_image = Some(image);
        Ok(())
    }

    /// `AwaitingSubjectPhoto -> Configuring`.
    pub fn confirm_subject(&mut self) -> Result<(), WorkflowError> {
        self.require_step(Step::AwaitingSubjectPhoto, "confirm the subject photo")?;
        if self.subject_image.is_none() {
            return Err(WorkflowError::Incomplete("no subject photo"));
        }
        self.step = Step::Configuring;
        Ok(())
    }

    /// `Configuring -> AwaitingSubjectPhoto`. Configuration is kept.
    pub fn back_to_upload(&mut self) -> Result<(), WorkflowError> {
        self.require_step(Step::Configuring, "go back to the upload step")?;
        self.step = Step::AwaitingSubjectPhoto;
        Ok(())
    }

    /* ---- configuration ---- */

    /// Switch between clothing and hair.
    ///
    /// A real change returns the input method to presets and clears
    /// every mode-specific field. Selecting the current target is a
    /// no-op.
    pub fn select_edit_target(&mut self, target: EditTarget) -> Result<(), WorkflowError> {
        self.require_step(Step::Configuring, "change the edit target")?;
        if self.edit_target == target {
            return Ok(());
        }
        self.edit_target = target;
        self.input_method = InputMethod::Preset;
        self.clear_mode_fields();
        Ok(())
    }

    /// Switch how the desired look is described. Selecting the current
    /// method is a no-op.
    pub fn select_input_method(&mut self, method: InputMethod) -> Result<(), WorkflowError> {
        self.require_step(Step::Configuring, "change the input method")?;
        if self.input_method == method {
            return Ok(());
        }
        self.input_method = method;
        self.clear_mode_fields();
        Ok(())
    }

    /// Change which presets are listed. The current selection is kept.
    pub fn select_gender(&mut self, gender: Gender) -> Result<(), WorkflowError> {
        self.require_step(Step::Configuring, "change the preset filter")?;
        if !gender.is_filter() {
            return Err(WorkflowError::InvalidGenderFilter(gender));
        }
        self.gender_filter = Some(gender);
        Ok(())
    }

    /// Choose a preset; its canonical description becomes the prompt.
    pub fn select_preset(&mut self, preset: &PresetItem) -> Result<(), WorkflowError> {
        self.require_step(Step::Configuring, "select a preset")?;
        self.require_method(InputMethod::Preset)?;
        if preset.category != self.edit_target {
            return Err(WorkflowError::PresetTargetMismatch {
                id: preset.id.clone(),
                category: preset.category,
                target: self.edit_target,
            });
        }
        self.selected_preset_id = Some(preset.id.clone());
        self.free_text_description = preset.canonical_description.clone();
        Ok(())
    }

    /// Accept a reference photo and start its description.
    ///
    /// The free-text field is cleared and locked until the returned
    /// ticket is finished. A newer reference image invalidates any
    /// ticket issued before it.
    pub fn set_reference_image(
        &mut self,
        image: StillImage,
    ) -> Result<DescriptionTicket, WorkflowError> {
        self.require_step(Step::Configuring, "attach a reference image")?;
        self.require_method(InputMethod::ReferenceImage)?;

        self.description_seq += 1;
        self.description_pending = true;
        self.free_text_description.clear();
        self.reference_image = Some(image.clone());

        Ok(DescriptionTicket {
            seq: self.description_seq,
            image,
            target: self.edit_target,
        })
    }

    /// Write a description result back.
    ///
    /// Returns `false` and leaves the session untouched when the ticket
    /// is stale (a newer reference image, a mode switch, or a reset
    /// happened after it was issued).
    pub fn finish_description(&mut self, seq: u64, text: String) -> bool {
        if !self.description_pending || seq != self.description_seq {
            return false;
        }
        self.description_pending = false;
        self.free_text_description = text;
        true
    }

    /// Edit the description text.
    pub fn set_free_text(&mut self, text: impl Into<String>) -> Result<(), WorkflowError> {
        self.require_step(Step::Configuring, "edit the description")?;
        if self.description_pending {
            return Err(WorkflowError::DescriptionPending);
        }
        self.free_text_description = text.into();
        Ok(())
    }

    /* ---- generation ---- */

    /// First unmet generation requirement, if any.
    pub fn missing_requirement(&self) -> Option<WorkflowError> {
        match self.input_method {
            InputMethod::Preset if self.selected_preset_id.is_none() => {
                Some(WorkflowError::Incomplete("no preset selected"))
            }
            InputMethod::ReferenceImage if self.reference_image.is_none() => {
                Some(WorkflowError::Incomplete("no reference image"))
            }
            InputMethod::ReferenceImage if self.description_pending => {
                Some(WorkflowError::DescriptionPending)
            }
            InputMethod::FreeText if self.free_text_description.trim().is_empty() => {
                Some(WorkflowError::Incomplete("description is empty"))
            }
            _ => None,
        }
    }

    /// Whether [`begin_generation`](Self::begin_generation) would succeed.
    pub fn can_generate(&self) -> bool {
        self.step == Step::Configuring && self.missing_requirement().is_none()
    }

    /// `Configuring -> Processing`: assemble the generation request.
    ///
    /// In preset mode an empty text field falls back to the preset's
    /// canonical description.
    pub fn begin_generation(
        &mut self,
        catalog: &PresetCatalog,
    ) -> Result<GenerationRequest, WorkflowError> {
        self.require_step(Step::Configuring, "start generation")?;
        if let Some(missing) = self.missing_requirement() {
            return Err(missing);
        }
        let subject_image = self
            .subject_image
            .clone()
            .ok_or(WorkflowError::Incomplete("no subject photo"))?;

        let text = self.free_text_description.trim();
        let prompt_text = match (self.input_method, self.selected_preset_id.as_deref()) {
            (InputMethod::Preset, Some(id)) => {
                let preset = catalog
                    .get(id)
                    .ok_or_else(|| WorkflowError::UnknownPreset(id.to_string()))?;
                if text.is_empty() {
                    preset.canonical_description.clone()
                } else {
                    text.to_string()
                }
            }
            _ => text.to_string(),
        };
        let reference_image = match self.input_method {
            InputMethod::ReferenceImage => self.reference_image.clone(),
            _ => None,
        };

        let request = GenerationRequest {
            request_id: Uuid::new_v4(),
            subject_image,
            reference_image,
            target: self.edit_target,
            prompt_text,
        };

        self.generation_id = Some(request.request_id);
        self.last_error = None;
        self.step = Step::Processing;
        Ok(request)
    }

    /// `Processing -> ResultReady` on success, `Processing -> Configuring`
    /// on failure. On failure only the step and `last_error` change.
    pub fn complete_generation(
        &mut self,
        request_id: Uuid,
        result: Result<StillImage, ServiceError>,
    ) -> Result<(), WorkflowError> {
        if self.step != Step::Processing || self.generation_id != Some(request_id) {
            return Err(WorkflowError::Superseded);
        }
        self.generation_id = None;

        match result {
            Ok(image) => {
                self.result_image = Some(image);
                self.step = Step::ResultReady;
            }
            Err(err) => {
                let message = err.message().trim();
                self.last_error = Some(if message.is_empty() {
                    GENERATION_FAILED_FALLBACK.to_string()
                } else {
                    message.to_string()
                });
                self.step = Step::Configuring;
            }
        }
        Ok(())
    }

    /// `ResultReady -> Configuring`, keeping the configuration.
    pub fn try_again(&mut self) -> Result<(), WorkflowError> {
        self.require_step(Step::ResultReady, "try again")?;
        self.result_image = None;
        self.step = Step::Configuring;
        Ok(())
    }

    /// Clear every field and return to the upload step.
    ///
    /// Outstanding description tickets and generation results are
    /// invalidated.
    pub fn reset(&mut self) {
        let next_seq = self.description_seq + 1;
        *self = Self::default();
        self.description_seq = next_seq;
    }

    // ---- private helpers ----

    fn require_step(&self, expected: Step, action: &'static str) -> Result<(), WorkflowError> {
        if self.step != expected {
            return Err(WorkflowError::InvalidTransition {
                action,
                step: self.step,
            });
        }
        Ok(())
    }

    fn require_method(&self, expected: InputMethod) -> Result<(), WorkflowError> {
        if self.input_method != expected {
            return Err(WorkflowError::WrongInputMethod {
                expected,
                actual: self.input_method,
            });
        }
        Ok(())
    }

    /// Clear preset, text, and reference image, and invalidate any
    /// pending description.
    fn clear_mode_fields(&mut self) {
        self.selected_preset_id = None;
        self.free_text_description.clear();
        self.reference_image = None;
        if self.description_pending {
            self.description_pending = false;
            self.description_seq += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn image(byte: u8) -> StillImage {
        StillImage::new("image/jpeg", vec![byte]).unwrap()
    }

    fn catalog() -> PresetCatalog {
        PresetCatalog::builtin().unwrap()
    }

    fn configuring() -> Session {
        let mut session = Session::new();
        session.set_subject_image(image(1)).unwrap();
        session.confirm_subject().unwrap();
        session
    }

    #[test]
    fn fresh_session_defaults() {
        let session = Session::new();
        assert_eq!(session.step(), Step::AwaitingSubjectPhoto);
        assert_eq!(session.edit_target(), EditTarget::Clothing);
        assert_eq!(session.input_method(), InputMethod::Preset);
        assert_eq!(session.gender_filter(), Gender::Female);
        assert!(!session.can_generate());
    }

    #[test]
    fn confirm_requires_subject_photo() {
        let mut session = Session::new();
        assert_matches!(session.confirm_subject(), Err(WorkflowError::Incomplete(_)));
        session.set_subject_image(image(1)).unwrap();
        session.confirm_subject().unwrap();
        assert_eq!(session.step(), Step::Configuring);
    }

    #[test]
    fn subject_photo_locked_after_confirm() {
        let mut session = configuring();
        assert_matches!(
            session.set_subject_image(image(2)),
            Err(WorkflowError::SubjectImageLocked)
        );
        session.back_to_upload().unwrap();
        session.set_subject_image(image(2)).unwrap();
        assert_eq!(session.subject_image(), Some(&image(2)));
    }

    #[test]
    fn configuration_rejected_outside_configuring() {
        let mut session = Session::new();
        assert_matches!(
            session.select_edit_target(EditTarget::Hair),
            Err(WorkflowError::InvalidTransition { step: Step::AwaitingSubjectPhoto, .. })
        );
        assert_matches!(
            session.select_input_method(InputMethod::FreeText),
            Err(WorkflowError::InvalidTransition { .. })
        );
    }

    #[test]
    fn switching_target_clears_preset_and_text() {
        let catalog = catalog();
        let mut session = configuring();
        session.select_preset(catalog.get("fc1").unwrap()).unwrap();
        assert!(!session.free_text_description().is_empty());

        session.select_edit_target(EditTarget::Hair).unwrap();
        assert_eq!(session.selected_preset_id(), None);
        assert_eq!(session.free_text_description(), "");
        assert_eq!(session.input_method(), InputMethod::Preset);
    }

    #[test]
    fn reselecting_same_target_keeps_selection() {
        let catalog = catalog();
        let mut session = configuring();
        session.select_preset(catalog.get("fc2").unwrap()).unwrap();
        session.select_edit_target(EditTarget::Clothing).unwrap();
        assert_eq!(session.selected_preset_id(), Some("fc2"));
    }

    #[test]
    fn switching_method_resets_mode_fields() {
        let mut session = configuring();
        session.select_input_method(InputMethod::ReferenceImage).unwrap();
        let ticket = session.set_reference_image(image(5)).unwrap();
        assert!(session.description_pending());

        session.select_input_method(InputMethod::FreeText).unwrap();
        assert_eq!(session.reference_image(), None);
        assert!(!session.description_pending());
        assert!(!session.finish_description(ticket.seq(), "late".into()));
        assert_eq!(session.free_text_description(), "");
    }

    #[test]
    fn preset_must_match_target() {
        let catalog = catalog();
        let mut session = configuring();
        assert_matches!(
            session.select_preset(catalog.get("fh1").unwrap()),
            Err(WorkflowError::PresetTargetMismatch { .. })
        );
        session.select_input_method(InputMethod::FreeText).unwrap();
        assert_matches!(
            session.select_preset(catalog.get("fc1").unwrap()),
            Err(WorkflowError::WrongInputMethod { .. })
        );
    }

    #[test]
    fn each_method_blocked_when_missing_its_field() {
        let catalog = catalog();

        let session = configuring();
        assert_matches!(session.missing_requirement(), Some(WorkflowError::Incomplete(_)));

        let mut with_preset = configuring();
        with_preset.select_preset(catalog.get("fc3").unwrap()).unwrap();
        assert!(with_preset.can_generate());

        let mut reference = configuring();
        reference.select_input_method(InputMethod::ReferenceImage).unwrap();
        assert_matches!(reference.missing_requirement(), Some(WorkflowError::Incomplete(_)));
        let ticket = reference.set_reference_image(image(4)).unwrap();
        assert_matches!(reference.missing_requirement(), Some(WorkflowError::DescriptionPending));
        reference.finish_description(ticket.seq(), String::new());
        assert!(reference.can_generate());

        let mut text = configuring();
        text.select_input_method(InputMethod::FreeText).unwrap();
        text.set_free_text(" \t\n").unwrap();
        assert!(!text.can_generate());
        text.set_free_text("linen shirt").unwrap();
        assert!(text.can_generate());
    }

    #[test]
    fn free_text_rejected_while_description_pending() {
        let mut session = configuring();
        session.select_input_method(InputMethod::ReferenceImage).unwrap();
        let ticket = session.set_reference_image(image(4)).unwrap();
        assert!(!session.text_editable());
        assert_matches!(session.set_free_text("x"), Err(WorkflowError::DescriptionPending));

        assert!(session.finish_description(ticket.seq(), "silk blouse".into()));
        assert!(session.text_editable());
        session.set_free_text("silk blouse, navy").unwrap();
    }

    #[test]
    fn newer_reference_image_discards_older_description() {
        let mut session = configuring();
        session.select_input_method(InputMethod::ReferenceImage).unwrap();
        let first = session.set_reference_image(image(4)).unwrap();
        let second = session.set_reference_image(image(5)).unwrap();

        assert!(!session.finish_description(first.seq(), "old".into()));
        assert!(session.description_pending());
        assert!(session.finish_description(second.seq(), "new".into()));
        assert_eq!(session.free_text_description(), "new");
        assert_eq!(second.image(), &image(5));
    }

    #[test]
    fn preset_request_uses_canonical_description() {
        let catalog = catalog();
        let mut session = configuring();
        let fc1 = catalog.get("fc1").unwrap();
        session.select_preset(fc1).unwrap();

        let request = session.begin_generation(&catalog).unwrap();
        assert_eq!(request.prompt_text, fc1.canonical_description);
        assert_eq!(request.target, EditTarget::Clothing);
        assert!(request.reference_image.is_none());
        assert_eq!(session.step(), Step::Processing);
    }

    #[test]
    fn processing_blocks_a_second_generation() {
        let catalog = catalog();
        let mut session = configuring();
        session.select_preset(catalog.get("fc1").unwrap()).unwrap();
        session.begin_generation(&catalog).unwrap();
        assert_matches!(
            session.begin_generation(&catalog),
            Err(WorkflowError::InvalidTransition { step: Step::Processing, .. })
        );
    }

    #[test]
    fn failure_changes_only_step_and_error() {
        let catalog = catalog();
        let mut session = configuring();
        session.select_input_method(InputMethod::FreeText).unwrap();
        session.set_free_text("denim jacket").unwrap();
        let request = session.begin_generation(&catalog).unwrap();
        let before = session.clone();

        session
            .complete_generation(request.request_id, Err(ServiceError::new("E")))
            .unwrap();
        assert_eq!(session.step(), Step::Configuring);
        assert_eq!(session.last_error(), Some("E"));

        assert_eq!(session.subject_image(), before.subject_image());
        assert_eq!(session.edit_target(), before.edit_target());
        assert_eq!(session.input_method(), before.input_method());
        assert_eq!(session.reference_image(), before.reference_image());
        assert_eq!(session.free_text_description(), before.free_text_description());
        assert_eq!(session.selected_preset_id(), before.selected_preset_id());
        assert_eq!(session.description_pending(), before.description_pending());
        assert_eq!(session.gender_filter(), before.gender_filter());
        assert_eq!(session.result_image(), before.result_image());
    }

    #[test]
    fn empty_failure_message_gets_fallback() {
        let catalog = catalog();
        let mut session = configuring();
        session.select_preset(catalog.get("fc1").unwrap()).unwrap();
        let request = session.begin_generation(&catalog).unwrap();
        session
            .complete_generation(request.request_id, Err(ServiceError::new("  ")))
            .unwrap();
        assert_eq!(session.last_error(), Some(GENERATION_FAILED_FALLBACK));
    }

    #[test]
    fn stale_generation_result_is_rejected() {
        let catalog = catalog();
        let mut session = configuring();
        session.select_preset(catalog.get("fc1").unwrap()).unwrap();
        let request = session.begin_generation(&catalog).unwrap();
        session.reset();

        assert_matches!(
            session.complete_generation(request.request_id, Ok(image(9))),
            Err(WorkflowError::Superseded)
        );
        assert_eq!(session.step(), Step::AwaitingSubjectPhoto);
        assert!(session.result_image().is_none());
    }

    #[test]
    fn try_again_keeps_configuration() {
        let catalog = catalog();
        let mut session = configuring();
        session.select_preset(catalog.get("fc4").unwrap()).unwrap();
        let request = session.begin_generation(&catalog).unwrap();
        session.complete_generation(request.request_id, Ok(image(9))).unwrap();
        assert_eq!(session.step(), Step::ResultReady);
        assert_eq!(
            session.result_preview(&catalog),
            Some(ResultPreview::PresetThumbnail(
                catalog.get("fc4").unwrap().thumbnail_ref.clone()
            ))
        );

        session.try_again().unwrap();
        assert_eq!(session.step(), Step::Configuring);
        assert_eq!(session.selected_preset_id(), Some("fc4"));
        assert!(session.result_image().is_none());
    }

    #[test]
    fn reset_clears_everything_and_invalidates_tickets() {
        let mut session = configuring();
        session.select_gender(Gender::Male).unwrap();
        session.select_input_method(InputMethod::ReferenceImage).unwrap();
        let ticket = session.set_reference_image(image(4)).unwrap();

        session.reset();
        assert_eq!(session.step(), Step::AwaitingSubjectPhoto);
        assert!(session.subject_image().is_none());
        assert!(session.reference_image().is_none());
        assert_eq!(session.gender_filter(), Gender::Female);
        assert!(!session.description_pending());
        assert!(!session.finish_description(ticket.seq(), "late".into()));
    }

    #[test]
    fn visible_presets_follow_target_and_gender() {
        let catalog = catalog();
        let mut session = configuring();
        session.select_edit_target(EditTarget::Hair).unwrap();
        session.select_gender(Gender::Male).unwrap();
        let ids: Vec<_> = session
            .visible_presets(&catalog)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, ["mh1", "mh2", "mh3", "mh4"]);
    }

    #[test]
    fn unisex_is_not_a_gender_filter() {
        let mut session = configuring();
        session.select_gender(Gender::Male).unwrap();
        assert_matches!(
            session.select_gender(Gender::Unisex),
            Err(WorkflowError::InvalidGenderFilter(Gender::Unisex))
        );
        assert_eq!(session.gender_filter(), Gender::Male);
    }
}
