//! Diabetes Risk API
//!
//! HTTP scoring service for type 2 diabetes risk from eight clinical
//! measurements.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     DIABETES RISK API                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  POST /predict (Axum)                                        │
//! │        │ validate (validator)                                │
//! │        ▼                                                     │
//! │  ┌──────────┐   ┌────────────┐   ┌────────────────────────┐  │
//! │  │  Scaler  │──▶│ Classifier │──▶│ Policy (tier, alert)   │  │
//! │  └──────────┘   └────────────┘   └────────────────────────┘  │
//! │        raw vector ─────────────▶ Explanation rules          │
//! │                                                              │
//! │  ModelContext: artifacts loaded once, shared read-only       │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

use crate::logic::model::ModelContext;
use crate::logic::risk::RiskPolicy;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub models: Arc<ModelContext>,
    pub policy: Arc<RiskPolicy>,
}

impl AppState {
    pub fn new(models: ModelContext, policy: RiskPolicy) -> Self {
        Self {
            models: Arc::new(models),
            policy: Arc::new(policy),
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::check))
        .route("/health", get(handlers::health::check))
        .route("/model/info", get(handlers::model::info))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
