//! Application workflows. Each use case depends only on ports and configuration.

pub mod list_tickets;
pub mod submit_ticket;
pub mod update_ticket_status;

pub use list_tickets::ListTickets;
pub use submit_ticket::{PersistenceFailureKind, SubmissionOutcome, SubmitTicket};
pub use update_ticket_status::{StatusUpdateOutcome, UpdateTicketStatus};
