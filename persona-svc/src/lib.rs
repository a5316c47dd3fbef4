//! persona-svc library interface
//!
//! Person enrichment service: creates person records whose age, gender and
//! country are filled in by three external name classifiers queried
//! concurrently, and serves filtered reads and partial updates over them.

pub mod api;
pub mod classifiers;
pub mod criteria;
pub mod enrichment;
pub mod error;
pub mod query;
pub mod repository;
pub mod service;

pub use crate::error::{Error, Result};

use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

use crate::enrichment::EnrichmentOrchestrator;
use crate::repository::PersonRepository;
use crate::service::PersonService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PersonService>,
}

impl AppState {
    pub fn new(repository: Arc<dyn PersonRepository>, enrichment: EnrichmentOrchestrator) -> Self {
        Self {
            service: Arc::new(PersonService::new(repository, enrichment)),
        }
    }
}

/// Build application router
///
/// Every response carries an `x-request-id` header; requests are logged with
/// method, path, status and latency.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::person_routes())
        .merge(api::health_routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .layer(middleware::from_fn(api::assign_request_id))
        .with_state(state)
}
