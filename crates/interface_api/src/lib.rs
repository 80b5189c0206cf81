//! HTTP API Layer
//!
//! REST API for the ledger using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: transactions, monthly summary, monthly report, health
//! - **Middleware**: request ids, tracing, audit logging
//! - **DTOs**: request/response bodies
//! - **Bootstrap**: builds the store, blob store and service from `ApiConfig`
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{bootstrap, create_router, AppState};
//!
//! let service = Arc::new(bootstrap::build_service(&config).await?);
//! let app = create_router(AppState::new(service));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod bootstrap;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_ledger::LedgerService;

use crate::handlers::{health, reports, summary, transactions};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LedgerService>,
}

impl AppState {
    pub fn new(service: Arc<LedgerService>) -> Self {
        Self { service }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Ledger routes
    let api_routes = Router::new()
        .route(
            "/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route("/transactions/:id", delete(transactions::delete_transaction))
        .route("/summary/monthly", get(summary::monthly_summary))
        .route("/reports/monthly", get(reports::monthly_report))
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
