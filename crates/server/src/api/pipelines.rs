//! Pipeline endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use laneboard_core::{LaneDetails, Pipeline, TicketDetails, UpsertPipeline};
use std::sync::Arc;

use super::errors::{board_error, ApiError};
use super::middleware::AuthUser;
use crate::state::AppState;

/// List the pipelines of a sub-account.
pub async fn list_pipelines(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(sub_account_id): Path<String>,
) -> Result<Json<Vec<Pipeline>>, ApiError> {
    state
        .board()
        .list_pipelines(&identity, &sub_account_id)
        .map(Json)
        .map_err(board_error)
}

/// Create or update a pipeline.
pub async fn upsert_pipeline(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(request): Json<UpsertPipeline>,
) -> Result<Json<Pipeline>, ApiError> {
    state
        .board()
        .upsert_pipeline(&identity, request)
        .map(Json)
        .map_err(board_error)
}

pub async fn get_pipeline(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Pipeline>, ApiError> {
    state
        .board()
        .get_pipeline(&identity, &id)
        .map(Json)
        .map_err(board_error)
}

/// Delete a pipeline together with its lanes and tickets.
pub async fn delete_pipeline(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Pipeline>, ApiError> {
    state
        .board()
        .delete_pipeline(&identity, &id)
        .map(Json)
        .map_err(board_error)
}

/// The board view: lanes in order, each with its hydrated tickets.
pub async fn list_pipeline_lanes(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<LaneDetails>>, ApiError> {
    state
        .board()
        .list_lanes_with_tickets(&identity, &id)
        .map(Json)
        .map_err(board_error)
}

pub async fn list_pipeline_tickets(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<TicketDetails>>, ApiError> {
    state
        .board()
        .list_tickets_for_pipeline(&identity, &id)
        .map(Json)
        .map_err(board_error)
}
