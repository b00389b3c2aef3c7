use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::api::SubmitResponse;

#[derive(Debug)]
pub enum AppError {
    /// Internal errors - logged but return a generic 500 to the caller
    Internal(anyhow::Error),
    /// Validation errors - message is safe to show
    Validation(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Internal(err) => {
                tracing::error!("internal error: {:?}", err);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(SubmitResponse::error("Internal server error")),
                )
                    .into_response()
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(SubmitResponse::error(msg))).into_response()
            }
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
