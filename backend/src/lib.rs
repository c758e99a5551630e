//! # Splitledger Backend
//!
//! Owns the expense store and serves the REST API used by the tracker UI.
//!
//! ```text
//! IO Layer (axum handlers, DTO mappers)
//!     ↓
//! Domain Layer (services, balance aggregator, settlement planner)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get},
    Router,
};
use shared::ValidationLimits;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::domain::{PaymentService, SummaryService, TransactionService, UserService};
use crate::io::rest::{health_apis, payment_apis, summary_apis, transaction_apis, user_apis};
use crate::storage::DbConnection;

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService<DbConnection>,
    pub transaction_service: TransactionService<DbConnection>,
    pub payment_service: PaymentService<DbConnection>,
    pub summary_service: SummaryService<DbConnection>,
    pub cors_origin: HeaderValue,
}

impl AppState {
    pub fn new(connection: DbConnection, config: &ServerConfig) -> Result<Self> {
        let connection = Arc::new(connection);
        let limits = ValidationLimits::default();
        let page_settings = config.page_settings();

        Ok(Self {
            user_service: UserService::new(connection.clone(), limits.clone()),
            transaction_service: TransactionService::new(
                connection.clone(),
                limits.clone(),
                page_settings,
            ),
            payment_service: PaymentService::new(connection.clone(), limits, page_settings),
            summary_service: SummaryService::new(connection),
            cors_origin: config.cors_origin_header()?,
        })
    }

    #[cfg(test)]
    pub async fn for_test() -> Self {
        let connection = DbConnection::init_test().await.unwrap();
        Self::new(connection, &ServerConfig::default()).unwrap()
    }
}

/// Open the database and build the services
pub async fn initialize_backend(config: &ServerConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let connection = DbConnection::new(&config.database_url).await?;

    info!("Setting up domain services");
    AppState::new(connection, config)
}

pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(app_state.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(health_apis::health))
        .route("/users", get(user_apis::list_users).post(user_apis::create_user))
        .route(
            "/users/:id",
            get(user_apis::get_user)
                .put(user_apis::update_user)
                .delete(user_apis::delete_user),
        )
        .route(
            "/transactions",
            get(transaction_apis::list_transactions).post(transaction_apis::create_transaction),
        )
        .route(
            "/transactions/:id",
            get(transaction_apis::get_transaction)
                .put(transaction_apis::update_transaction)
                .delete(transaction_apis::delete_transaction),
        )
        .route(
            "/transactions/:id/soft-delete",
            delete(transaction_apis::soft_delete_transaction),
        )
        .route("/summary", get(summary_apis::get_summary))
        .route(
            "/payments",
            get(payment_apis::list_payments).post(payment_apis::create_payment),
        )
        .route(
            "/payments/:id",
            get(payment_apis::get_payment)
                .put(payment_apis::update_payment)
                .delete(payment_apis::delete_payment),
        )
        .route(
            "/payments/:id/soft-delete",
            delete(payment_apis::soft_delete_payment),
        )
        .route("/payment-summary", get(summary_apis::get_payment_summary));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
