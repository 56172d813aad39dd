use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::AppError;
use crate::use_cases::{PersistenceFailureKind, SubmissionOutcome, SubmitTicket};
use crate::utils::sanitize::sanitize_json;
use crate::validation::RawSubmission;
use crate::AppState;

pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<RawSubmission>,
) -> Response {
    if let Ok(value) = serde_json::to_value(&payload) {
        tracing::debug!(payload = %sanitize_json(&value), "Submission received");
    }

    let use_case = SubmitTicket::new(
        state.tickets.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    match use_case.execute(payload).await {
        SubmissionOutcome::Success { ticket_id } => (
            StatusCode::CREATED,
            Json(json!({
                "ticketId": ticket_id,
                "status": "pending",
                "message": "Ticket received. A confirmation email is on its way.",
            })),
        )
            .into_response(),
        SubmissionOutcome::SuccessDegraded { ticket_id, .. } => (
            StatusCode::ACCEPTED,
            Json(json!({
                "ticketId": ticket_id,
                "status": "error",
                "warning": "Ticket received, but the confirmation email could not be sent.",
            })),
        )
            .into_response(),
        SubmissionOutcome::ValidationFailed(e) => AppError::Validation(e.to_string()).into_response(),
        SubmissionOutcome::PersistenceFailed { kind, detail } => match kind {
            PersistenceFailureKind::Validation => AppError::Validation(detail),
            PersistenceFailureKind::Conflict => AppError::Conflict(detail),
            PersistenceFailureKind::Unknown => AppError::Persistence(detail),
        }
        .into_response(),
        SubmissionOutcome::ConfigurationError { missing } => {
            AppError::Configuration(format!("missing settings: {}", missing.join(", ")))
                .into_response()
        }
    }
}
