//! Shape checks for ticket submissions. Pure functions, no side effects.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::domain::ticket::MAX_LINE_ITEMS;
use crate::domain::{LineItem, TicketDraft};

/// Submission payload as posted by the form.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RawSubmission {
    #[serde(default, alias = "clientEmail")]
    pub email: Option<String>,
    #[serde(default, alias = "devise")]
    pub currency: Option<String>,
    #[serde(default, alias = "lineItems")]
    pub tickets: Vec<RawLineItem>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RawLineItem {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub amount: Option<RawAmount>,
}

/// Amounts arrive either as form strings or as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl RawAmount {
    fn as_text(&self) -> String {
        match self {
            RawAmount::Text(s) => sanitize_string(s),
            RawAmount::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("at most {max} tickets can be submitted, got {given}")]
    TooManyLineItems { max: usize, given: usize },

    #[error("ticket {slot}: amount must be a non-negative decimal within the money range")]
    InvalidAmount { slot: usize },

    #[error("no complete ticket: each ticket needs a type, a code and an amount")]
    IncompleteLineItems,
}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, value: Option<&str>) -> ValidationResult<String> {
    let value = sanitize_string(value.unwrap_or_default());
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }

    Ok(value)
}

struct Slot {
    kind: String,
    code: String,
    amount: String,
}

impl Slot {
    fn from_raw(raw: &RawLineItem) -> Self {
        Self {
            kind: sanitize_string(raw.kind.as_deref().unwrap_or_default()),
            code: sanitize_string(raw.code.as_deref().unwrap_or_default()),
            amount: raw.amount.as_ref().map(RawAmount::as_text).unwrap_or_default(),
        }
    }

    fn has_code(&self) -> bool {
        !self.kind.is_empty() && !self.code.is_empty()
    }

    fn is_complete(&self) -> bool {
        self.has_code() && !self.amount.is_empty()
    }
}

/// Normalizes a raw submission into a ticket draft.
///
/// Rules run in order: email, currency, slot count, presence of at least one
/// (type, code) pair, then amount parsing. Slots missing any of type, code or amount
/// are dropped without error; if nothing survives the submission is rejected.
pub fn validate_submission(raw: &RawSubmission) -> ValidationResult<TicketDraft> {
    let client_email = validate_required("email", raw.email.as_deref())?;
    let currency = validate_required("currency", raw.currency.as_deref())?;

    if raw.tickets.len() > MAX_LINE_ITEMS {
        return Err(ValidationError::TooManyLineItems {
            max: MAX_LINE_ITEMS,
            given: raw.tickets.len(),
        });
    }

    let slots: Vec<Slot> = raw.tickets.iter().map(Slot::from_raw).collect();
    if !slots.iter().any(Slot::has_code) {
        return Err(ValidationError::MissingField("ticket code"));
    }

    let mut line_items = Vec::with_capacity(slots.len());
    for (index, slot) in slots.into_iter().enumerate() {
        if !slot.is_complete() {
            continue;
        }

        let amount = parse_amount(&slot.amount).ok_or(ValidationError::InvalidAmount { slot: index + 1 })?;
        line_items.push(LineItem {
            kind: slot.kind,
            code: slot.code,
            amount,
        });
    }

    if line_items.is_empty() {
        return Err(ValidationError::IncompleteLineItems);
    }

    Ok(TicketDraft {
        client_email,
        currency,
        line_items,
    })
}

// Money range: up to 999 999 999 999 with at most 8 decimal places.
const MAX_AMOUNT_LEN: usize = 32;
const MAX_INTEGER_DIGITS: i64 = 12;
const MAX_AMOUNT_SCALE: i64 = 8;

/// Parses a non-negative amount. Exponent notation is accepted only while the
/// value stays inside the money range, so later rescaling stays cheap.
fn parse_amount(value: &str) -> Option<BigDecimal> {
    if value.len() > MAX_AMOUNT_LEN {
        return None;
    }

    let amount = BigDecimal::from_str(value).ok()?;
    let (_, scale) = amount.as_bigint_and_exponent();
    let integer_digits = amount.digits() as i64 - scale;
    if scale > MAX_AMOUNT_SCALE || integer_digits > MAX_INTEGER_DIGITS {
        return None;
    }

    if amount < BigDecimal::from(0) {
        return None;
    }
    Some(amount)
}
