use axum::{http::StatusCode, Json};
use laneboard_core::BoardError;
use serde::Serialize;

/// Error body returned by every API handler.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// Map a board failure onto its HTTP status.
pub fn board_error(err: BoardError) -> ApiError {
    let status = match &err {
        BoardError::NotFound { .. } => StatusCode::NOT_FOUND,
        BoardError::Conflict(_) => StatusCode::CONFLICT,
        BoardError::Database(_) => {
            tracing::error!("Board storage failure: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    api_error(status, err.to_string())
}
