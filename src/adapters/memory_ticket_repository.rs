//! In-process TicketRepository, used by tests and local tooling.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Ticket, TicketDraft, TicketPatch};
use crate::ports::{RepositoryError, RepositoryResult, TicketRepository};

#[derive(Clone, Default)]
pub struct MemoryTicketRepository {
    tickets: Arc<RwLock<HashMap<Uuid, Ticket>>>,
}

impl MemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }

    /// Stores a ticket as-is, bypassing the create path.
    pub async fn insert(&self, ticket: Ticket) {
        self.tickets.write().await.insert(ticket.id, ticket);
    }
}

#[async_trait]
impl TicketRepository for MemoryTicketRepository {
    async fn create(&self, draft: TicketDraft) -> RepositoryResult<Ticket> {
        let ticket = Ticket::new(draft);
        let mut tickets = self.tickets.write().await;
        if tickets.contains_key(&ticket.id) {
            return Err(RepositoryError::Conflict(ticket.id.to_string()));
        }
        tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Ticket> {
        self.tickets
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn update(&self, id: Uuid, patch: TicketPatch) -> RepositoryResult<Ticket> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        ticket.apply(&patch);
        Ok(ticket.clone())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Ticket>> {
        let mut tickets: Vec<Ticket> = self.tickets.read().await.values().cloned().collect();
        tickets.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(tickets)
    }
}
