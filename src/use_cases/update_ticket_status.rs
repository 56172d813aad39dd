//! Update ticket status use case.
//! Records an administrator decision, then tells the client about it.

use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Ticket, TicketPatch, TicketStatus};
use crate::notifications::templates;
use crate::ports::{Notifier, RepositoryError, TicketRepository};

#[derive(Debug)]
pub enum StatusUpdateOutcome {
    /// Requested status is not `validated` or `rejected`.
    InvalidStatus(String),
    NotFound(Uuid),
    TransitionNotAllowed { from: TicketStatus, to: TicketStatus },
    PersistenceFailed(String),
    Success(Ticket),
    /// The status change is committed; only the email failed.
    EmailFailed { ticket: Ticket, detail: String },
}

pub struct UpdateTicketStatus {
    tickets: Arc<dyn TicketRepository>,
    notifier: Arc<dyn Notifier>,
    config: Arc<Config>,
}

impl UpdateTicketStatus {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        notifier: Arc<dyn Notifier>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            tickets,
            notifier,
            config,
        }
    }

    pub async fn execute(
        &self,
        id: Uuid,
        status: &str,
        admin_notes: Option<String>,
    ) -> StatusUpdateOutcome {
        let next = match status.trim().parse::<TicketStatus>() {
            Ok(next) if next.is_admin_decision() => next,
            _ => {
                tracing::info!(ticket_id = %id, status = %status, "Rejected status update: invalid status");
                return StatusUpdateOutcome::InvalidStatus(status.to_string());
            }
        };

        let current = match self.tickets.find_by_id(id).await {
            Ok(ticket) => ticket,
            Err(RepositoryError::NotFound(_)) => return StatusUpdateOutcome::NotFound(id),
            Err(e) => {
                tracing::error!(ticket_id = %id, error = %e, "Failed to load ticket");
                return StatusUpdateOutcome::PersistenceFailed(e.to_string());
            }
        };

        if !current.status.can_transition_to(next) {
            tracing::info!(
                ticket_id = %id,
                from = %current.status,
                to = %next,
                "Rejected status update: transition not allowed"
            );
            return StatusUpdateOutcome::TransitionNotAllowed {
                from: current.status,
                to: next,
            };
        }

        let patch = TicketPatch::decision(next, admin_notes.unwrap_or_default());
        let ticket = match self.tickets.update(id, patch).await {
            Ok(ticket) => ticket,
            Err(RepositoryError::NotFound(_)) => return StatusUpdateOutcome::NotFound(id),
            Err(e) => {
                tracing::error!(ticket_id = %id, error = %e, "Failed to persist status update");
                return StatusUpdateOutcome::PersistenceFailed(e.to_string());
            }
        };

        tracing::info!(ticket_id = %id, status = %ticket.status, "Ticket status updated");

        let sender = match self.config.mail.delivery_sender() {
            Ok(sender) => sender,
            Err(missing) => {
                let detail = format!("mail delivery is not configured: {}", missing.join(", "));
                tracing::error!(ticket_id = %id, error = %detail, "Status email skipped; status change kept");
                return StatusUpdateOutcome::EmailFailed { ticket, detail };
            }
        };

        let email = templates::status_update(&ticket).addressed(sender, &ticket.client_email);
        match self.notifier.send(&email).await {
            Ok(message_id) => {
                tracing::info!(ticket_id = %id, message_id = %message_id, "Status email sent");
                StatusUpdateOutcome::Success(ticket)
            }
            Err(e) => {
                tracing::warn!(ticket_id = %id, error = %e, "Status email failed; status change kept");
                StatusUpdateOutcome::EmailFailed {
                    ticket,
                    detail: e.to_string(),
                }
            }
        }
    }
}
