//! Handler functions for bar result filtering.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::errors::{ApiError, ValidationError};
use crate::services::classification::{BarFilter, BarResult, FilteredBars};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub bars: Vec<BarResult>,
    #[serde(default)]
    pub filter: BarFilter,
}

pub async fn filter_bars(
    State(state): State<AppState>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> Result<Json<FilteredBars>, ApiError> {
    let Json(request) = payload?;
    request.filter.validate().map_err(ValidationError::from)?;

    Ok(Json(request.filter.apply(request.bars, &state.policy)))
}
