//! Colada Finder backend.
//!
//! An Axum service that lets people crowd-verify whether bars serve piña
//! coladas, aggregates those votes into per-place tallies, classifies places
//! as verified for filtering and badges, and stores ratings and reviews.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod middleware;
pub mod services;
pub mod utils;

use axum::extract::{FromRef, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::auth::JwtValidator;
use crate::database::Database;
use crate::services::aggregator::VerificationAggregator;
use crate::services::classification::VerificationPolicy;
use crate::services::reviews::ReviewService;
use crate::services::verification::VerificationService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtValidator,
    pub policy: VerificationPolicy,
    pub verifications: VerificationService,
    pub aggregator: VerificationAggregator,
    pub reviews: ReviewService,
}

impl AppState {
    pub fn new(db: Database, jwt: JwtValidator, policy: VerificationPolicy) -> Self {
        Self {
            verifications: VerificationService::new(db.clone()),
            aggregator: VerificationAggregator::new(db.clone()),
            reviews: ReviewService::new(db.clone()),
            db,
            jwt,
            policy,
        }
    }
}

impl FromRef<AppState> for JwtValidator {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    database: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        database: state.db.status().await.as_str(),
    })
}

/// Builds the full router with state and middleware applied.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api::api_router());

    middleware::with_request_tracing(router).with_state(state)
}
