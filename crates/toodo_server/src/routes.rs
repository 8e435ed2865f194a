//! Route table and request handlers.

use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use log::info;
use std::path::Path;
use std::time::Instant;
use toodo_core::Toodo;
use tower_http::services::ServeDir;

pub const UI_PREFIX: &str = "/ui";

/// Builds the application router.
///
/// - `GET /toodo`: stored items, newest first.
/// - `POST /toodo`: sync a posted list, answer with the refreshed list.
/// - `/`: temporary redirect to [`UI_PREFIX`], never cached.
/// - `/ui/*`: static files from `ui_dir`.
pub fn build_router(state: AppState, ui_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", any(home))
        .route("/toodo", get(list_toodos).post(post_toodos))
        .nest_service(UI_PREFIX, ServeDir::new(ui_dir.as_ref()))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn home() -> impl IntoResponse {
    (
        StatusCode::TEMPORARY_REDIRECT,
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::EXPIRES, "0"),
            (header::PRAGMA, "no-cache"),
            (header::LOCATION, UI_PREFIX),
        ],
    )
}

async fn list_toodos(State(state): State<AppState>) -> Result<Json<Vec<Toodo>>, ApiError> {
    let items = state
        .with_service(|service| service.list().map_err(ApiError::from))
        .await?;
    Ok(Json(items))
}

async fn post_toodos(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<Toodo>>, ApiError> {
    let incoming = decode_toodos(&body)?;
    let items = state
        .with_service(move |service| service.sync(incoming).map_err(ApiError::from))
        .await?;
    Ok(Json(items))
}

/// A blank body or a JSON `null` reads like `[]`.
fn decode_toodos(body: &[u8]) -> Result<Vec<Toodo>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let items: Option<Vec<Toodo>> = serde_json::from_slice(body)?;
    Ok(items.unwrap_or_default())
}

async fn log_requests(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    info!(
        "event=http_request module=server method={} path={} status={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
