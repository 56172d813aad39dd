//! Shared fixtures for the workflow and API suites: an in-memory store, a
//! scripted notifier and a fully populated configuration.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use ticket_verify::adapters::MemoryTicketRepository;
use ticket_verify::config::{AdminConfig, Config, LogFormat, MailConfig};
use ticket_verify::domain::{Ticket, TicketDraft, TicketPatch};
use ticket_verify::ports::{
    MessageId, Notifier, NotifierError, NotifierResult, OutgoingEmail, RepositoryError,
    RepositoryResult, TicketRepository,
};
use ticket_verify::use_cases::{SubmitTicket, UpdateTicketStatus};
use ticket_verify::validation::{RawAmount, RawLineItem, RawSubmission};
use ticket_verify::AppState;

pub const SENDER: &str = "noreply@tickets.example.com";
pub const ADMIN: &str = "admin@tickets.example.com";
pub const CLIENT: &str = "client@example.com";
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse";

pub fn test_config() -> Config {
    Config {
        server_port: 3000,
        database_url: "postgres://localhost/unused".to_string(),
        database_max_connections: 1,
        mail: MailConfig {
            sender_address: Some(SENDER.to_string()),
            admin_address: Some(ADMIN.to_string()),
            api_url: Some("https://mail.example.com/v3".to_string()),
            api_key: Some("test-key".to_string()),
        },
        admin: AdminConfig {
            panel_url: Some("https://tickets.example.com/admin".to_string()),
            username: Some(ADMIN_USER.to_string()),
            password: Some(ADMIN_PASSWORD.to_string()),
        },
        cors_allowed_origins: None,
        log_format: LogFormat::Pretty,
    }
}

/// Records every send attempt and fails for scripted recipients.
#[derive(Default)]
pub struct RecordingNotifier {
    attempts: Mutex<Vec<OutgoingEmail>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn fail_for(&self, address: &str) {
        self.failing.lock().await.insert(address.to_string());
    }

    pub async fn attempts(&self) -> Vec<OutgoingEmail> {
        self.attempts.lock().await.clone()
    }

    pub async fn attempts_to(&self, address: &str) -> Vec<OutgoingEmail> {
        self.attempts()
            .await
            .into_iter()
            .filter(|email| email.to == address)
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, email: &OutgoingEmail) -> NotifierResult<MessageId> {
        self.attempts.lock().await.push(email.clone());

        if self.failing.lock().await.contains(&email.to) {
            return Err(NotifierError::Provider {
                status_code: 401,
                body: "{\"code\":\"unauthorized\",\"message\":\"Key not found\"}".to_string(),
            });
        }

        Ok(format!("<{}@mail.test>", Uuid::new_v4()))
    }
}

/// Store whose writes always fail with the given error.
pub struct FailingRepository {
    pub error: fn() -> RepositoryError,
}

#[async_trait]
impl TicketRepository for FailingRepository {
    async fn create(&self, _draft: TicketDraft) -> RepositoryResult<Ticket> {
        Err((self.error)())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Ticket> {
        Err(RepositoryError::NotFound(id.to_string()))
    }

    async fn update(&self, _id: Uuid, _patch: TicketPatch) -> RepositoryResult<Ticket> {
        Err((self.error)())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Ticket>> {
        Err((self.error)())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Err((self.error)())
    }
}

pub struct Harness {
    pub repo: MemoryTicketRepository,
    pub notifier: Arc<RecordingNotifier>,
    pub config: Arc<Config>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            repo: MemoryTicketRepository::new(),
            notifier: RecordingNotifier::new(),
            config: Arc::new(config),
        }
    }

    pub fn submit(&self) -> SubmitTicket {
        SubmitTicket::new(
            Arc::new(self.repo.clone()),
            self.notifier.clone(),
            self.config.clone(),
        )
    }

    pub fn update(&self) -> UpdateTicketStatus {
        UpdateTicketStatus::new(
            Arc::new(self.repo.clone()),
            self.notifier.clone(),
            self.config.clone(),
        )
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            tickets: Arc::new(self.repo.clone()),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
        }
    }

    /// Stores a pending ticket directly, without sending any email.
    pub async fn pending_ticket(&self) -> Ticket {
        self.repo
            .create(TicketDraft {
                client_email: CLIENT.to_string(),
                currency: "EUR".to_string(),
                line_items: vec![ticket_verify::domain::LineItem {
                    kind: "PCS".to_string(),
                    code: "12345678".to_string(),
                    amount: "10.5".parse().unwrap(),
                }],
            })
            .await
            .unwrap()
    }
}

pub fn slot(kind: &str, code: &str, amount: &str) -> RawLineItem {
    RawLineItem {
        kind: Some(kind.to_string()),
        code: Some(code.to_string()),
        amount: Some(RawAmount::Text(amount.to_string())),
    }
}

pub fn submission(tickets: Vec<RawLineItem>) -> RawSubmission {
    RawSubmission {
        email: Some(CLIENT.to_string()),
        currency: Some("EUR".to_string()),
        tickets,
    }
}

pub fn valid_submission() -> RawSubmission {
    submission(vec![
        slot("PCS", "12345678", "10.5"),
        slot("Neosurf", "ABCDEFGH", "20.25"),
    ])
}
