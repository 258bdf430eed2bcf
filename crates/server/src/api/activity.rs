use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use laneboard_core::{ActivityFilter, ActivityRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::errors::{api_error, ApiError};
use crate::state::AppState;

/// Maximum allowed limit for activity queries
const MAX_LIMIT: i64 = 1000;

/// Default limit for activity queries
const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for the activity endpoint
#[derive(Debug, Deserialize)]
pub struct ActivityQueryParams {
    pub sub_account_id: Option<String>,
    pub user_id: Option<String>,
    /// e.g. `lanes_reordered`
    pub event_type: Option<String>,
    /// Maximum number of records to return (default 100, max 1000)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ActivityQueryResponse {
    /// Matching records, newest first
    pub events: Vec<ActivityRecord>,
    /// Total number of matching records
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Query the activity log
pub async fn query_activity(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivityQueryParams>,
) -> Result<Json<ActivityQueryResponse>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    // Shared between query and count
    let mut base_filter = ActivityFilter::new();

    if let Some(ref sub_account_id) = params.sub_account_id {
        base_filter = base_filter.with_sub_account_id(sub_account_id);
    }

    if let Some(ref user_id) = params.user_id {
        base_filter = base_filter.with_user_id(user_id);
    }

    if let Some(ref event_type) = params.event_type {
        base_filter = base_filter.with_event_type(event_type);
    }

    let query_filter = base_filter.clone().with_limit(limit).with_offset(offset);

    let events = state.activity_store().query(&query_filter).map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to query activity: {}", e),
        )
    })?;

    let total = state.activity_store().count(&base_filter).map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to count activity: {}", e),
        )
    })?;

    Ok(Json(ActivityQueryResponse {
        events,
        total,
        limit,
        offset,
    }))
}
