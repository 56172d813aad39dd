//! Framework-agnostic domain types.

pub mod ticket;

pub use ticket::{LineItem, Ticket, TicketDraft, TicketPatch, TicketStatus, UnknownStatus};
