//! Auto-description of reference images.
//!
//! A failed description is never surfaced: it degrades to an empty,
//! editable text field and a warning in the log.

use std::sync::Arc;

use mirror_core::services::DescriptionService;

use crate::session::DescriptionTicket;

/// Runs description tickets against the description collaborator.
#[derive(Clone)]
pub struct AutoDescriber {
    service: Arc<dyn DescriptionService>,
}

impl AutoDescriber {
    pub fn new(service: Arc<dyn DescriptionService>) -> Self {
        Self { service }
    }

    /// Describe the ticket's image. Failures yield an empty string.
    pub async fn describe(&self, ticket: &DescriptionTicket) -> String {
        match self.service.describe(ticket.image(), ticket.target()).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!(
                    ticket = ticket.seq(),
                    edit_target = %ticket.target(),
                    error = %e,
                    "Reference image description failed",
                );
                String::new()
            }
        }
    }
}
