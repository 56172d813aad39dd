use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Ticket, TicketDraft, TicketPatch};

// Postgres SQLSTATE codes mapped onto the repository taxonomy.
const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";
const NOT_NULL_VIOLATION: &str = "23502";

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store refused the document's shape.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound(err.to_string()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => RepositoryError::Conflict(db_err.message().to_string()),
                Some(CHECK_VIOLATION) | Some(NOT_NULL_VIOLATION) => {
                    RepositoryError::Validation(db_err.message().to_string())
                }
                // Class 22: data exceptions (bad numeric, string too long, ...)
                Some(code) if code.starts_with("22") => {
                    RepositoryError::Validation(db_err.message().to_string())
                }
                _ => RepositoryError::Unavailable(db_err.message().to_string()),
            },
            _ => RepositoryError::Unavailable(err.to_string()),
        }
    }
}

/// Persistence capability for tickets.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn create(&self, draft: TicketDraft) -> RepositoryResult<Ticket>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Ticket>;

    async fn update(&self, id: Uuid, patch: TicketPatch) -> RepositoryResult<Ticket>;

    /// All tickets, most recently submitted first.
    async fn find_all(&self) -> RepositoryResult<Vec<Ticket>>;

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
