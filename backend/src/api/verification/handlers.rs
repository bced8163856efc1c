//! Handler functions for the crowd verification API.
//!
//! These functions validate input, call the verification and aggregation
//! services and shape their results for clients. Stats reads never fail:
//! an unreachable store is reported as zero votes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storage::VoteRecord;

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::services::aggregator::AggregateStats;
use crate::services::classification::VerificationPolicy;
use crate::utils::{serde_flag, PlaceId};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVoteRequest {
    pub place_id: String,
    pub has_pina_colada: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub id: i64,
    pub place_id: String,
    pub user_id: i64,
    #[serde(with = "serde_flag")]
    pub has_pina_colada: bool,
    pub created_at: DateTime<Utc>,
}

impl From<VoteRecord> for VoteResponse {
    fn from(record: VoteRecord) -> Self {
        Self {
            id: record.id,
            place_id: record.place_id,
            user_id: record.user_id,
            has_pina_colada: record.has_pina_colada,
            created_at: record.created_at,
        }
    }
}

pub async fn submit_vote(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<SubmitVoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>, ApiError> {
    let Json(request) = payload?;
    let place_id = PlaceId::parse(&request.place_id)?;

    let record = state
        .verifications
        .submit_vote(&place_id, user.id, request.has_pina_colada)
        .await?;
    Ok(Json(record.into()))
}

pub async fn stats(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<AggregateStats>, ApiError> {
    let place_id = PlaceId::parse(&place_id)?;
    Ok(Json(state.aggregator.stats(&place_id).await.or_empty()))
}

pub async fn user_vote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(place_id): Path<String>,
) -> Result<Json<Option<VoteResponse>>, ApiError> {
    let place_id = PlaceId::parse(&place_id)?;
    let vote = state.verifications.user_vote(&place_id, user.id).await;
    Ok(Json(vote.map(VoteResponse::from)))
}

pub async fn policy(State(state): State<AppState>) -> Json<VerificationPolicy> {
    Json(state.policy)
}
