//! HTTP front end of the dashboard.
//!
//! # Endpoints
//!
//! - `GET /` - the dashboard page; `start`, `end`, `tab` and `raw` carry the controls
//! - `GET /health` - health check
//! - `POST /reload` - read the data files again, then back to `/`
//!
//! Every page request is a full run of the pipeline over the cached dataset.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::dashboard::{self, resolve_endpoints, Controls, Tab};
use crate::error::{DashboardError, DashboardResult};
use crate::page::{error_page, Page, PageMode};
use crate::store::DataStore;
use crate::VERSION;

/// Shared state of the web app.
#[derive(Clone)]
pub struct AppState {
    store: Arc<DataStore>,
}

impl AppState {
    pub fn new(store: DataStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }
}

/// Query parameters of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub tab: Option<Tab>,
    /// Present when the raw-table checkbox is ticked.
    pub raw: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Whether the dataset is in the cache.
    pub data_loaded: bool,
}

/// A failed request, answered with an error page.
#[derive(Debug)]
pub enum WebError {
    Dashboard(DashboardError),
    /// The blocking task running the request did not finish.
    Internal(String),
}

impl From<DashboardError> for WebError {
    fn from(e: DashboardError) -> Self {
        WebError::Dashboard(e)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            WebError::Dashboard(e) => {
                let status = match &e {
                    DashboardError::InvalidDate(_) => StatusCode::BAD_REQUEST,
                    DashboardError::MissingInput { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            WebError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        error!(status = status.as_u16(), error = %message, "dashboard request failed");
        (status, Html(error_page(&message))).into_response()
    }
}

/// One full run for the query, from the cached dataset to the page text.
fn render_page(store: &DataStore, query: &DashboardQuery) -> DashboardResult<String> {
    let dataset = store.get()?;
    let endpoints = resolve_endpoints(
        query.start.as_deref(),
        query.end.as_deref(),
        dataset.day_span(),
    )?;
    let controls = Controls {
        endpoints,
        tab: query.tab.unwrap_or_default(),
        show_raw: query.raw.is_some(),
    };
    let run = dashboard::run(&dataset, &controls)?;
    Ok(Page::new(&run, PageMode::Interactive).to_string())
}

async fn dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, WebError> {
    // loading, filtering and drawing are all synchronous
    let html = tokio::task::spawn_blocking(move || render_page(&state.store, &query))
        .await
        .map_err(|e| WebError::Internal(format!("Task join error: {}", e)))??;
    Ok(Html(html))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.unwrap_or("unknown").to_string(),
        data_loaded: state.store.is_loaded(),
    })
}

async fn reload(State(state): State<AppState>) -> Result<Redirect, WebError> {
    tokio::task::spawn_blocking(move || state.store.reload().map(|_| ()))
        .await
        .map_err(|e| WebError::Internal(format!("Task join error: {}", e)))??;
    Ok(Redirect::to("/"))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/health", get(health))
        .route("/reload", post(reload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the dashboard until the process is stopped. The store should
/// already hold the dataset, so a missing file stops startup instead.
pub async fn run_server(store: DataStore, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(AppState::new(store));
    info!("Starting bike sharing dashboard on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
