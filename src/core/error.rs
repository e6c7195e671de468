use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error, shaped to the media endpoint's wire contract.
///
/// The three operations fail differently on purpose: listing reports a
/// normalized message under `e`, upload and delete report nothing beyond
/// the status code. See DESIGN.md for the compatibility notes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("sorry this user is not authorized")]
    Unauthorized,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("listing failed: {0}")]
    List(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("delete failed: {0}")]
    Delete(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "sorry this user is not authorized" })),
            )
                .into_response(),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": msg }))).into_response()
            }
            AppError::List(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "e": msg })),
            )
                .into_response(),
            AppError::Upload(ref msg) => {
                tracing::error!("media upload failed: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            AppError::Delete(ref msg) => {
                tracing::error!("media delete failed: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            AppError::Internal(ref msg) => {
                tracing::error!("internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
