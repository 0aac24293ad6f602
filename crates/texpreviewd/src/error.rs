use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use texpreview_build::CompileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing LaTeX code")]
    MissingCode,

    #[error("Compilation failed: {0:#}")]
    Internal(anyhow::Error),
}

impl From<CompileError> for ApiError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::EmptySource => ApiError::MissingCode,
            CompileError::Internal(e) => ApiError::Internal(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::MissingCode => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Missing LaTeX code" }),
            ),
            ApiError::Internal(e) => {
                log::error!("compile failed unexpectedly: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Compilation failed", "detail": format!("{:#}", e) }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
