//! Submit ticket use case.
//! Validates a form submission, stores it and notifies the client and the administrator.

use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Ticket, TicketPatch};
use crate::notifications::templates;
use crate::ports::{Notifier, NotifierError, RepositoryError, TicketRepository};
use crate::validation::{validate_submission, RawSubmission, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceFailureKind {
    Validation,
    Conflict,
    Unknown,
}

impl From<&RepositoryError> for PersistenceFailureKind {
    fn from(err: &RepositoryError) -> Self {
        match err {
            RepositoryError::Validation(_) => PersistenceFailureKind::Validation,
            RepositoryError::Conflict(_) => PersistenceFailureKind::Conflict,
            RepositoryError::NotFound(_) | RepositoryError::Unavailable(_) => {
                PersistenceFailureKind::Unknown
            }
        }
    }
}

/// Result of one submission. Exactly one is produced per call.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Mail settings are incomplete; nothing was attempted.
    ConfigurationError { missing: Vec<&'static str> },
    ValidationFailed(ValidationError),
    PersistenceFailed {
        kind: PersistenceFailureKind,
        detail: String,
    },
    Success { ticket_id: Uuid },
    /// Ticket stored, but the client confirmation could not be delivered.
    /// The ticket has been moved to the `error` status.
    SuccessDegraded { ticket_id: Uuid, detail: String },
}

impl SubmissionOutcome {
    pub fn ticket_id(&self) -> Option<Uuid> {
        match self {
            SubmissionOutcome::Success { ticket_id }
            | SubmissionOutcome::SuccessDegraded { ticket_id, .. } => Some(*ticket_id),
            _ => None,
        }
    }
}

/// Use case for accepting ticket submissions.
pub struct SubmitTicket {
    tickets: Arc<dyn TicketRepository>,
    notifier: Arc<dyn Notifier>,
    config: Arc<Config>,
}

impl SubmitTicket {
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

    pub async fn execute(&self, raw: RawSubmission) -> SubmissionOutcome {
        let addresses = match self.config.mail.submission_addresses() {
            Ok(addresses) => addresses,
            Err(missing) => {
                tracing::error!(missing = ?missing, "Submission refused: mail delivery is not configured");
                return SubmissionOutcome::ConfigurationError { missing };
            }
        };

        let draft = match validate_submission(&raw) {
            Ok(draft) => draft,
            Err(e) => {
                tracing::info!(reason = %e, "Submission failed validation");
                return SubmissionOutcome::ValidationFailed(e);
            }
        };

        let ticket = match self.tickets.create(draft).await {
            Ok(ticket) => ticket,
            Err(e) => {
                let kind = PersistenceFailureKind::from(&e);
                tracing::error!(kind = ?kind, error = %e, "Failed to store ticket");
                return SubmissionOutcome::PersistenceFailed {
                    kind,
                    detail: e.to_string(),
                };
            }
        };

        tracing::info!(
            ticket_id = %ticket.id,
            line_items = ticket.line_items.len(),
            currency = %ticket.currency,
            "Ticket stored"
        );

        let confirmation =
            templates::client_confirmation(&ticket).addressed(addresses.sender, &ticket.client_email);

        let (ticket, outcome) = match self.notifier.send(&confirmation).await {
            Ok(message_id) => {
                tracing::info!(ticket_id = %ticket.id, message_id = %message_id, "Client confirmation sent");
                let ticket_id = ticket.id;
                (ticket, SubmissionOutcome::Success { ticket_id })
            }
            Err(e) => self.flag_delivery_failure(ticket, e).await,
        };

        let notification = templates::admin_notification(&ticket, self.config.admin.panel_url.as_deref())
            .addressed(addresses.sender, addresses.admin);

        match self.notifier.send(&notification).await {
            Ok(message_id) => {
                tracing::info!(ticket_id = %ticket.id, message_id = %message_id, "Admin notification sent");
            }
            Err(e) => {
                tracing::warn!(ticket_id = %ticket.id, error = %e, "Admin notification failed");
            }
        }

        outcome
    }

    /// Moves the ticket to `error` after the client confirmation failed.
    async fn flag_delivery_failure(
        &self,
        ticket: Ticket,
        err: NotifierError,
    ) -> (Ticket, SubmissionOutcome) {
        let detail = err.to_string();
        tracing::warn!(ticket_id = %ticket.id, error = %detail, "Client confirmation failed");

        let note = format!("Client confirmation email failed: {}", detail);
        let ticket = match self
            .tickets
            .update(ticket.id, TicketPatch::delivery_failure(note))
            .await
        {
            Ok(updated) => updated,
            Err(update_err) => {
                tracing::error!(
                    ticket_id = %ticket.id,
                    error = %update_err,
                    "Failed to flag ticket after delivery failure"
                );
                ticket
            }
        };

        let ticket_id = ticket.id;
        (ticket, SubmissionOutcome::SuccessDegraded { ticket_id, detail })
    }
}
