//! Async owner of a try-on session.
//!
//! [`WorkflowController`] serialises every transition through one lock
//! and never holds that lock while a collaborator call is in flight, so
//! description and generation results can land while the user keeps
//! interacting. Results carry a ticket or request id; stale ones are
//! discarded by the session.
//!
//! State changes are broadcast via a [`tokio::sync::broadcast`] channel.
//! Call [`WorkflowController::subscribe`] to receive them.

use std::sync::Arc;

use mirror_core::image::StillImage;
use mirror_core::preset::{PresetCatalog, PresetItem};
use mirror_core::services::{DescriptionService, GenerationService, ShareOutcome, ShareSink};
use mirror_core::types::{EditTarget, Gender, InputMethod};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use crate::bridge::AutoDescriber;
use crate::error::WorkflowError;
use crate::events::WorkflowEvent;
use crate::session::{DescriptionTicket, ResultPreview, Session, Step};

/// Broadcast channel capacity for workflow events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Drives one session through the try-on workflow.
pub struct WorkflowController {
    session: Mutex<Session>,
    catalog: Arc<PresetCatalog>,
    describer: AutoDescriber,
    generator: Arc<dyn GenerationService>,
    event_tx: broadcast::Sender<WorkflowEvent>,
}

impl WorkflowController {
    pub fn new(
        catalog: Arc<PresetCatalog>,
        describer: Arc<dyn DescriptionService>,
        generator: Arc<dyn GenerationService>,
    ) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            session: Mutex::new(Session::new()),
            catalog,
            describer: AutoDescriber::new(describer),
            generator,
            event_tx,
        })
    }

    /// Subscribe to workflow events.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.event_tx.subscribe()
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    /// A copy of the current session.
    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    pub async fn step(&self) -> Step {
        self.session.lock().await.step()
    }

    pub async fn can_generate(&self) -> bool {
        self.session.lock().await.can_generate()
    }

    /// Presets for the current edit target and gender filter.
    pub async fn visible_presets(&self) -> Vec<PresetItem> {
        let session = self.session.lock().await;
        session
            .visible_presets(&self.catalog)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn result_preview(&self) -> Option<ResultPreview> {
        self.session.lock().await.result_preview(&self.catalog)
    }

    /* ---- subject photo ---- */

    pub async fn set_subject_image(&self, image: StillImage) -> Result<(), WorkflowError> {
        self.apply(|s| s.set_subject_image(image)).await
    }

    pub async fn confirm_subject(&self) -> Result<(), WorkflowError> {
        self.apply(Session::confirm_subject).await
    }

    pub async fn back_to_upload(&self) -> Result<(), WorkflowError> {
        self.apply(Session::back_to_upload).await
    }

    /* ---- configuration ---- */

    pub async fn select_edit_target(&self, target: EditTarget) -> Result<(), WorkflowError> {
        self.apply(|s| s.select_edit_target(target)).await
    }

    pub async fn select_input_method(&self, method: InputMethod) -> Result<(), WorkflowError> {
        self.apply(|s| s.select_input_method(method)).await
    }

    pub async fn select_gender(&self, gender: Gender) -> Result<(), WorkflowError> {
        self.apply(|s| s.select_gender(gender)).await
    }

    /// Select a catalog preset by id.
    pub async fn select_preset(&self, id: &str) -> Result<(), WorkflowError> {
        let preset = self
            .catalog
            .get(id)
            .ok_or_else(|| WorkflowError::UnknownPreset(id.to_string()))?;
        self.apply(|s| s.select_preset(preset)).await
    }

    pub async fn set_free_text(&self, text: impl Into<String>) -> Result<(), WorkflowError> {
        let text = text.into();
        self.apply(|s| s.set_free_text(text)).await
    }

    /// Accept a reference photo and describe it in the background.
    ///
    /// The returned handle completes once the description has been
    /// written back (or discarded as stale). Dropping it does not cancel
    /// the task.
    pub async fn attach_reference_image(
        self: &Arc<Self>,
        image: StillImage,
    ) -> Result<JoinHandle<()>, WorkflowError> {
        let ticket = self.apply(|s| s.set_reference_image(image)).await?;
        self.emit(WorkflowEvent::DescriptionStarted {
            ticket: ticket.seq(),
            target: ticket.target(),
        });
        tracing::debug!(ticket = ticket.seq(), edit_target = %ticket.target(), "Describing reference image");

        let this = Arc::clone(self);
        Ok(tokio::spawn(async move { this.run_description(ticket).await }))
    }

    /* ---- generation ---- */

    /// Run one generation attempt to completion.
    ///
    /// Returns the step the session ended in: `ResultReady` on success,
    /// `Configuring` with `last_error` set on failure. Errors are only
    /// returned when the attempt could not start or its result arrived
    /// after a reset.
    pub async fn generate(&self) -> Result<Step, WorkflowError> {
        let request = self.apply(|s| s.begin_generation(&self.catalog)).await?;
        self.emit(WorkflowEvent::GenerationStarted {
            request_id: request.request_id,
            target: request.target,
        });
        tracing::info!(
            request_id = %request.request_id,
            edit_target = %request.target,
            with_reference = request.reference_image.is_some(),
            "Generation started",
        );

        let result = self.generator.generate(&request).await;
        match &result {
            Ok(image) => {
                tracing::info!(request_id = %request.request_id, bytes = image.len(), "Generation completed");
                self.emit(WorkflowEvent::GenerationCompleted {
                    request_id: request.request_id,
                });
            }
            Err(e) => {
                tracing::error!(request_id = %request.request_id, error = %e, "Generation failed");
                self.emit(WorkflowEvent::GenerationFailed {
                    request_id: request.request_id,
                    error: e.message().to_string(),
                });
            }
        }

        let request_id = request.request_id;
        self.apply(|s| {
            s.complete_generation(request_id, result)?;
            Ok(s.step())
        })
        .await
    }

    pub async fn try_again(&self) -> Result<(), WorkflowError> {
        self.apply(Session::try_again).await
    }

    /// Clear the session and return to the upload step.
    pub async fn reset(&self) {
        let from = {
            let mut session = self.session.lock().await;
            let from = session.step();
            session.reset();
            from
        };
        self.step_changed(from, Step::AwaitingSubjectPhoto);
        self.emit(WorkflowEvent::Reset);
    }

    /// Hand the result image to `sink`. Only valid in `ResultReady`.
    pub async fn share(&self, sink: &dyn ShareSink) -> Result<ShareOutcome, WorkflowError> {
        let image = {
            let session = self.session.lock().await;
            if session.step() != Step::ResultReady {
                return Err(WorkflowError::InvalidTransition {
                    action: "share the result",
                    step: session.step(),
                });
            }
            session.result_image().cloned().ok_or(WorkflowError::NoResult)?
        };

        let outcome = sink.share(&image).await.map_err(WorkflowError::Share)?;
        tracing::info!(outcome = ?outcome, "Result shared");
        Ok(outcome)
    }

    // ---- private helpers ----

    /// Run a transition under the lock and broadcast any step change.
    async fn apply<T>(
        &self,
        op: impl FnOnce(&mut Session) -> Result<T, WorkflowError>,
    ) -> Result<T, WorkflowError> {
        let mut session = self.session.lock().await;
        let from = session.step();
        let out = op(&mut *session)?;
        let to = session.step();
        drop(session);

        self.step_changed(from, to);
        Ok(out)
    }

    fn step_changed(&self, from: Step, to: Step) {
        if from != to {
            tracing::debug!(from = %from, to = %to, "Workflow step changed");
            self.emit(WorkflowEvent::StepChanged { from, to });
        }
    }

    async fn run_description(&self, ticket: DescriptionTicket) {
        let text = self.describer.describe(&ticket).await;
        let empty = text.is_empty();
        let applied = self
            .session
            .lock()
            .await
            .finish_description(ticket.seq(), text);

        if !applied {
            tracing::debug!(ticket = ticket.seq(), "Discarding stale description");
        }
        self.emit(WorkflowEvent::DescriptionFinished {
            ticket: ticket.seq(),
            applied,
            empty,
        });
    }

    fn emit(&self, event: WorkflowEvent) {
        // No subscribers is fine.
        let _ = self.event_tx.send(event);
    }
}
