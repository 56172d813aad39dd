//! Concrete implementations of the ports.

pub mod http_mailer;
pub mod memory_ticket_repository;
pub mod postgres_ticket_repository;

pub use http_mailer::HttpMailer;
pub use memory_ticket_repository::MemoryTicketRepository;
pub use postgres_ticket_repository::PostgresTicketRepository;
