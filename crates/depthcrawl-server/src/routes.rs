use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::OpenApi;

use crate::auth::require_api_key;
use crate::dto::{CrawlRequest, CrawlResponse, HealthResponse};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Largest request body the API accepts.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the full router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/v1/crawl", post(crawl))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi));

    public
        .merge(api)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Crawl
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/crawl",
    request_body = CrawlRequest,
    responses(
        (status = 200, description = "Crawl result grouped by depth", body = CrawlResponse),
        (status = 400, description = "Invalid root URL or depth", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "crawl"
)]
pub async fn crawl(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CrawlRequest>,
) -> Result<Json<CrawlResponse>, ApiError> {
    tracing::info!(root_url = %body.root_url, max_depth = body.max_depth, "Crawl requested");

    let outcome = state
        .crawler
        .crawl_url(&body.root_url, body.max_depth)
        .await?;

    Ok(Json(CrawlResponse::from(outcome)))
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
