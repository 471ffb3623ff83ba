//! Events emitted by the workflow controller.

use mirror_core::types::EditTarget;
use serde::Serialize;
use uuid::Uuid;

use crate::session::Step;

/// A workflow state change a UI layer may want to react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WorkflowEvent {
    /// The session moved to another step.
    StepChanged { from: Step, to: Step },

    /// A reference image was accepted and its description requested.
    DescriptionStarted { ticket: u64, target: EditTarget },

    /// A description request returned.
    DescriptionFinished {
        ticket: u64,
        /// `false` when the result was stale and discarded.
        applied: bool,
        /// `true` when the text is empty (including after a failure).
        empty: bool,
    },

    /// A generation request was dispatched.
    GenerationStarted { request_id: Uuid, target: EditTarget },

    /// The generation collaborator returned an image.
    GenerationCompleted { request_id: Uuid },

    /// The generation collaborator failed.
    GenerationFailed {
        request_id: Uuid,
        /// Human-readable error description.
        error: String,
    },

    /// The session was cleared.
    Reset,
}
