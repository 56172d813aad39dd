use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::use_cases::{ListTickets, StatusUpdateOutcome, UpdateTicketStatus};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: String,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

pub async fn list_tickets(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tickets = ListTickets::new(state.tickets.clone()).execute().await?;
    Ok(Json(tickets))
}

pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = ListTickets::new(state.tickets.clone()).get(id).await?;
    Ok(Json(ticket))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Response {
    let use_case = UpdateTicketStatus::new(
        state.tickets.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    match use_case.execute(id, &payload.status, payload.admin_notes).await {
        StatusUpdateOutcome::Success(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        StatusUpdateOutcome::EmailFailed { ticket, detail } => {
            let status = StatusCode::BAD_GATEWAY;
            (
                status,
                Json(json!({
                    "error": AppError::Notification(detail).to_string(),
                    "status": status.as_u16(),
                    "ticket": ticket,
                })),
            )
                .into_response()
        }
        StatusUpdateOutcome::InvalidStatus(given) => AppError::BadRequest(format!(
            "invalid status '{}': expected validated or rejected",
            given
        ))
        .into_response(),
        StatusUpdateOutcome::NotFound(id) => {
            AppError::NotFound(format!("Ticket {} not found", id)).into_response()
        }
        StatusUpdateOutcome::TransitionNotAllowed { from, to } => AppError::Conflict(format!(
            "ticket is already {}, it cannot become {}",
            from, to
        ))
        .into_response(),
        StatusUpdateOutcome::PersistenceFailed(detail) => AppError::Persistence(detail).into_response(),
    }
}
