pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod ports;
pub mod startup;
pub mod use_cases;
pub mod utils;
pub mod validation;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;
use crate::middleware::{auth::admin_basic_auth, request_logger::request_logger_middleware};
use crate::ports::{Notifier, TicketRepository};

#[derive(Clone)]
pub struct AppState {
    pub tickets: Arc<dyn TicketRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<Config>,
}

pub fn create_app(state: AppState) -> Router {
    let admin = Router::new()
        .route("/tickets", get(handlers::admin::list_tickets))
        .route("/tickets/:id", get(handlers::admin::get_ticket))
        .route("/tickets/:id/status", post(handlers::admin::update_status))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            admin_basic_auth,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/submit", post(handlers::tickets::submit))
        .nest("/admin", admin)
        .layer(axum::middleware::from_fn(request_logger_middleware))
        .layer(cors_layer(state.config.cors_allowed_origins.as_deref()))
        .with_state(state)
}

fn cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match allowed_origins {
        Some(raw) => {
            let origins: Vec<HeaderValue> = raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect();
            layer.allow_origin(AllowOrigin::list(origins))
        }
        None => layer,
    }
}
