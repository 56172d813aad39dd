//! Postgres implementation of TicketRepository.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{LineItem, Ticket, TicketDraft, TicketPatch, TicketStatus};
use crate::ports::{RepositoryError, RepositoryResult, TicketRepository};

const TICKET_COLUMNS: &str = "id, client_email, currency, line_items, status, \
     submitted_at, validated_at, admin_notes, updated_at";

/// Postgres-backed ticket repository.
#[derive(Clone)]
pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn create(&self, draft: TicketDraft) -> RepositoryResult<Ticket> {
        let ticket = Ticket::new(draft);

        let row = sqlx::query_as::<_, TicketRow>(&format!(
            r#"
            INSERT INTO tickets (
                id, client_email, currency, line_items, status,
                submitted_at, validated_at, admin_notes, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(ticket.id)
        .bind(&ticket.client_email)
        .bind(&ticket.currency)
        .bind(Json(&ticket.line_items))
        .bind(ticket.status.as_str())
        .bind(ticket.submitted_at)
        .bind(ticket.validated_at)
        .bind(&ticket.admin_notes)
        .bind(ticket.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.into_domain()
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Ticket> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {} FROM tickets WHERE id = $1",
            TICKET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.ok_or_else(|| RepositoryError::NotFound(id.to_string()))?
            .into_domain()
    }

    async fn update(&self, id: Uuid, patch: TicketPatch) -> RepositoryResult<Ticket> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            r#"
            UPDATE tickets
            SET status = $2,
                validated_at = COALESCE($3, validated_at),
                admin_notes = COALESCE($4, admin_notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(id)
        .bind(patch.status.as_str())
        .bind(patch.validated_at)
        .bind(&patch.admin_notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.ok_or_else(|| RepositoryError::NotFound(id.to_string()))?
            .into_domain()
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {} FROM tickets ORDER BY submitted_at DESC",
            TICKET_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        rows.into_iter().map(TicketRow::into_domain).collect()
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;
        Ok(())
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    client_email: String,
    currency: String,
    line_items: Json<Vec<LineItem>>,
    status: String,
    submitted_at: chrono::DateTime<chrono::Utc>,
    validated_at: Option<chrono::DateTime<chrono::Utc>>,
    admin_notes: Option<String>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TicketRow {
    fn into_domain(self) -> RepositoryResult<Ticket> {
        let status = self
            .status
            .parse::<TicketStatus>()
            .map_err(|e| RepositoryError::Validation(e.to_string()))?;

        Ok(Ticket {
            id: self.id,
            client_email: self.client_email,
            currency: self.currency,
            line_items: self.line_items.0,
            status,
            submitted_at: self.submitted_at,
            validated_at: self.validated_at,
            admin_notes: self.admin_notes,
            updated_at: self.updated_at,
        })
    }
}
