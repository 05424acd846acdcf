use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use depthcrawl_core::CrawlError;

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `CrawlError`.
pub struct ApiError(pub CrawlError);

impl From<CrawlError> for ApiError {
    fn from(err: CrawlError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Only invalid input aborts a crawl; per-page failures never surface here.
        let (status, error_type) = if self.0.is_fatal() {
            (StatusCode::BAD_REQUEST, "validation_error")
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.0.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}
