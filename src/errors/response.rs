use axum::{
    response::{IntoResponse, Response, Redirect},
    http::StatusCode,
};
use urlencoding;
use crate::errors::AppError;

// The IntoResponse trait implementation converts AppError into a well-formed HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Authentication errors redirect to login
            AppError::Auth(msg) => {
                Redirect::to(&format!("/?error={}", urlencoding::encode(&msg)))
                    .into_response()
            }

            // Store errors are internal server errors
            AppError::Store(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Store error: {}", e)
            ).into_response(),

            // Template read errors are bad requests
            AppError::File(e) => (
                StatusCode::BAD_REQUEST,
                format!("File error: {}", e)
            ).into_response(),
        }
    }
}
