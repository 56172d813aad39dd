//! Ticket domain entity.
//! A submitted verification request carrying one to three line items.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

pub const MAX_LINE_ITEMS: usize = 3;

/// Lifecycle state of a ticket.
///
/// `Pending` is the only state with outgoing transitions: administrators move it to
/// `Validated` or `Rejected`, and the submission workflow moves it to `Error` when the
/// confirmation email could not be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Pending,
    Validated,
    Rejected,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ticket status: {0}")]
pub struct UnknownStatus(pub String);

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::Validated => "validated",
            TicketStatus::Rejected => "rejected",
            TicketStatus::Error => "error",
        }
    }

    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        matches!(
            (self, next),
            (TicketStatus::Pending, TicketStatus::Validated)
                | (TicketStatus::Pending, TicketStatus::Rejected)
                | (TicketStatus::Pending, TicketStatus::Error)
        )
    }

    /// Statuses an administrator may set through the panel.
    pub fn is_admin_decision(&self) -> bool {
        matches!(self, TicketStatus::Validated | TicketStatus::Rejected)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TicketStatus::Pending),
            "validated" => Ok(TicketStatus::Validated),
            "rejected" => Ok(TicketStatus::Rejected),
            "error" => Ok(TicketStatus::Error),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A single (type, code, amount) entry of a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub code: String,
    pub amount: BigDecimal,
}

/// Domain entity representing a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub client_email: String,
    pub currency: String,
    pub line_items: Vec<LineItem>,
    pub status: TicketStatus,
    pub submitted_at: DateTime<Utc>,
    pub validated_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Builds a new pending ticket from a validated draft.
    pub fn new(draft: TicketDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_email: draft.client_email,
            currency: draft.currency,
            line_items: draft.line_items,
            status: TicketStatus::Pending,
            submitted_at: now,
            validated_at: None,
            admin_notes: None,
            updated_at: now,
        }
    }

    /// Applies a patch in place. Immutable fields are never touched.
    pub fn apply(&mut self, patch: &TicketPatch) {
        self.status = patch.status;
        if let Some(validated_at) = patch.validated_at {
            self.validated_at = Some(validated_at);
        }
        if let Some(notes) = &patch.admin_notes {
            self.admin_notes = Some(notes.clone());
        }
        self.updated_at = Utc::now();
    }
}

/// Normalized submission ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketDraft {
    pub client_email: String,
    pub currency: String,
    pub line_items: Vec<LineItem>,
}

/// Mutable subset of a ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketPatch {
    pub status: TicketStatus,
    pub validated_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
}

impl TicketPatch {
    /// Administrator decision: stamps `validated_at` with the current time.
    pub fn decision(status: TicketStatus, admin_notes: impl Into<String>) -> Self {
        Self {
            status,
            validated_at: Some(Utc::now()),
            admin_notes: Some(admin_notes.into()),
        }
    }

    /// System-driven downgrade after the confirmation email failed.
    pub fn delivery_failure(note: impl Into<String>) -> Self {
        Self {
            status: TicketStatus::Error,
            validated_at: None,
            admin_notes: Some(note.into()),
        }
    }
}
