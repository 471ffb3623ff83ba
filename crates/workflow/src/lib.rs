//! Try-on workflow orchestration.
//!
//! [`session::Session`] is the single mutable value describing one
//! try-on attempt; it only changes through named transitions.
//! [`controller::WorkflowController`] owns a session, drives the
//! description and generation collaborators, and broadcasts
//! [`events::WorkflowEvent`]s for UI layers.

pub mod bridge;
pub mod controller;
pub mod error;
pub mod events;
pub mod session;
