//! Ports (traits) that use cases depend on. Adapters live in `crate::adapters`.

pub mod notifier;
pub mod repository;

pub use notifier::{MessageId, Notifier, NotifierError, NotifierResult, OutgoingEmail};
pub use repository::{RepositoryError, RepositoryResult, TicketRepository};
