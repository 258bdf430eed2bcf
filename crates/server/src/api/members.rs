use axum::{
    extract::{Path, State},
    Json,
};
use laneboard_core::{Member, UpsertMember};
use std::sync::Arc;

use super::errors::{board_error, ApiError};
use super::middleware::AuthUser;
use crate::state::AppState;

pub async fn upsert_member(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(request): Json<UpsertMember>,
) -> Result<Json<Member>, ApiError> {
    state
        .board()
        .upsert_member(&identity, request)
        .map(Json)
        .map_err(board_error)
}

pub async fn get_member(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Member>, ApiError> {
    state
        .board()
        .get_member(&identity, &id)
        .map(Json)
        .map_err(board_error)
}
