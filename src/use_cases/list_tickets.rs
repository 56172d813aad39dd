use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Ticket;
use crate::ports::{RepositoryResult, TicketRepository};

/// Read-only queries backing the admin panel.
pub struct ListTickets {
    tickets: Arc<dyn TicketRepository>,
}

impl ListTickets {
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    /// Every ticket, most recently submitted first.
    pub async fn execute(&self) -> RepositoryResult<Vec<Ticket>> {
        self.tickets.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<Ticket> {
        self.tickets.find_by_id(id).await
    }
}
