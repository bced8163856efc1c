//! Defines the HTTP routes for bar result filtering.

use axum::{routing::post, Router};

use super::handlers::filter_bars;
use crate::AppState;

pub fn bars_router() -> Router<AppState> {
    Router::new().route("/bars/filter", post(filter_bars))
}
