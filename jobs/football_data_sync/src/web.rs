use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::{
    config::SyncConfig,
    fixture_sync::pull_fixtures,
    pipeline::{SyncFailure, SyncReport},
    standings_sync::pull_standings,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SyncConfig>,
}

impl AppState {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Plain-text trigger response: `ok` or the error detail.
fn respond(result: Result<SyncReport, SyncFailure>) -> Response {
    match result {
        Ok(_) => (StatusCode::OK, "ok").into_response(),
        Err(failure) => (failure.error.status_code(), failure.error.to_string()).into_response(),
    }
}

#[axum::debug_handler]
pub async fn pull_fixtures_handler(State(state): State<AppState>) -> Response {
    respond(pull_fixtures(&state.config).await)
}

#[axum::debug_handler]
pub async fn pull_standings_handler(State(state): State<AppState>) -> Response {
    respond(pull_standings(&state.config).await)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/pull-fixtures",
            get(pull_fixtures_handler).post(pull_fixtures_handler),
        )
        .route(
            "/api/pull-standings",
            get(pull_standings_handler).post(pull_standings_handler),
        )
        .with_state(state)
}

pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.server.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Sync triggers available at http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
