use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Transport-level failures. Chess-level problems never end up here; they are
/// reported inside a 200 move response.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Json(#[from] JsonRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Json(rejection) => {
                tracing::warn!("Rejected request body: {}", rejection.body_text());
                (StatusCode::BAD_REQUEST, rejection.body_text())
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}
