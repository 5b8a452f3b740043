//! CivicDesk
//!
//! Municipal complaint desk: citizens file complaints, the desk routes each
//! one to a department, and administrators move it through a fixed status
//! lifecycle.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  routes / middleware        axum handlers, bearer extractor   │
//! ├───────────────────────────────────────────────────────────────┤
//! │  session                    JWT issue / validate / revoke     │
//! │  application                ComplaintStore, AccountService    │
//! ├───────────────────────────────────────────────────────────────┤
//! │  policy     lifecycle       who may see / fire which rows     │
//! │  domain                     Actor, Complaint, value objects   │
//! ├───────────────────────────────────────────────────────────────┤
//! │  ports  ──▶ infrastructure  in-memory repos, keyword router   │
//! └───────────────────────────────────────────────────────────────┘
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod lifecycle;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod ports;
pub mod routes;
pub mod session;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::application::{AccountService, ComplaintStore};
use crate::config::ServiceConfig;
use crate::infrastructure::{
    InMemoryActorRepository, InMemoryComplaintRepository, KeywordClassifier, TracingEventPublisher,
};
use crate::session::SessionManager;

pub use error::{CoreError, CoreResult};
pub use models::*;

/// Shared service state
pub struct AppState {
    pub sessions: SessionManager,
    pub accounts: AccountService,
    pub complaints: ComplaintStore,
}

impl AppState {
    /// Wire every service to in-memory storage
    pub fn in_memory(config: &ServiceConfig) -> Self {
        let actors = Arc::new(InMemoryActorRepository::new());
        let publisher = Arc::new(TracingEventPublisher);

        Self {
            sessions: SessionManager::new(config.auth.clone(), actors.clone()),
            accounts: AccountService::new(actors, publisher.clone(), config.auth.min_password_len),
            complaints: ComplaintStore::new(
                Arc::new(InMemoryComplaintRepository::new()),
                Arc::new(KeywordClassifier::new(config.classifier.reject_unmatched)),
                publisher,
            ),
        }
    }
}

/// Build the API router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/auth", routes::auth::router())
        .route("/me", get(routes::auth::me))
        .nest("/complaints", routes::complaints::router())
        .nest("/admin", routes::admin::router())
}
