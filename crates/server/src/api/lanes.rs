//! Lane endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use laneboard_core::{Lane, LaneOrder, TicketDetails, UpsertLane};
use std::sync::Arc;

use super::errors::{board_error, ApiError};
use super::middleware::AuthUser;
use crate::state::AppState;

/// Create or update a lane. New lanes without an order are appended.
pub async fn upsert_lane(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(request): Json<UpsertLane>,
) -> Result<Json<Lane>, ApiError> {
    state
        .board()
        .upsert_lane(&identity, request)
        .map(Json)
        .map_err(board_error)
}

pub async fn get_lane(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Lane>, ApiError> {
    state
        .board()
        .get_lane(&identity, &id)
        .map(Json)
        .map_err(board_error)
}

pub async fn delete_lane(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Lane>, ApiError> {
    state
        .board()
        .delete_lane(&identity, &id)
        .map(Json)
        .map_err(board_error)
}

/// Apply a batch of lane positions. Either every entry lands or none does.
pub async fn reorder_lanes(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(lanes): Json<Vec<LaneOrder>>,
) -> Result<StatusCode, ApiError> {
    state
        .board()
        .reorder_lanes(&identity, &lanes)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(board_error)
}

pub async fn list_lane_tickets(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<TicketDetails>>, ApiError> {
    state
        .board()
        .list_tickets_for_lane(&identity, &id)
        .map(Json)
        .map_err(board_error)
}
