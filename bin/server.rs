// Catalog Curator - Web Server
// REST API over the curation pipeline and the SQLite catalog

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use catalog_curator::{
    delete_entry, fingerprint_exists, get_all_entries, get_entry, get_events_for_entry,
    insert_entry, open_database,
    CatalogEntry, CurationConfig, CurationError, CurationPipeline, RawListing, VERSION,
};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const ACTOR: &str = "api";

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
    pipeline: Arc<CurationPipeline>,
}

impl AppState {
    fn db(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        success: false,
        data: None,
        error: Some(message.into()),
    };
    (status, Json(body)).into_response()
}

fn internal_error(context: &str, err: anyhow::Error) -> Response {
    error!(error = %err, "{}", context);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, context)
}

// ============================================================================
// API Handlers
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "OK",
        version: VERSION,
    }))
}

/// GET /api/catalog - All entries in creation order
async fn list_entries(State(state): State<AppState>) -> Response {
    let conn = state.db();

    match get_all_entries(&conn) {
        Ok(entries) => (StatusCode::OK, Json(ApiResponse::ok(entries))).into_response(),
        Err(e) => internal_error("Failed to load catalog", e),
    }
}

/// GET /api/catalog/:id - One entry
async fn show_entry(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let conn = state.db();

    match get_entry(&conn, &id) {
        Ok(Some(entry)) => (StatusCode::OK, Json(ApiResponse::ok(entry))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, format!("No catalog entry with id {}", id)),
        Err(e) => internal_error("Failed to load entry", e),
    }
}

/// POST /api/catalog - Curate a raw listing and store it
async fn create_entry(State(state): State<AppState>, Json(listing): Json<RawListing>) -> Response {
    let conn = state.db();

    // Checked before curating so a duplicate does not advance the name rotation
    match fingerprint_exists(&conn, &listing.fingerprint()) {
        Ok(true) => return error_response(StatusCode::CONFLICT, "Listing already in the catalog"),
        Ok(false) => {}
        Err(e) => return internal_error("Failed to check for duplicates", e),
    }

    let entry: CatalogEntry = match state.pipeline.curate(&listing) {
        Ok(entry) => entry,
        Err(err @ (CurationError::Rejected { .. } | CurationError::BelowQuality { .. })) => {
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        Err(err @ CurationError::IncompleteExtraction) => {
            return error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
    };

    match insert_entry(&conn, &entry, ACTOR) {
        Ok(true) => (StatusCode::CREATED, Json(ApiResponse::ok(entry))).into_response(),
        Ok(false) => error_response(StatusCode::CONFLICT, "Listing already in the catalog"),
        Err(e) => internal_error("Failed to store entry", e),
    }
}

/// GET /api/catalog/:id/events - Audit trail of an entry, oldest first
async fn entry_events(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let conn = state.db();

    match get_events_for_entry(&conn, &id) {
        Ok(events) if events.is_empty() => {
            error_response(StatusCode::NOT_FOUND, format!("No events for id {}", id))
        }
        Ok(events) => (StatusCode::OK, Json(ApiResponse::ok(events))).into_response(),
        Err(e) => internal_error("Failed to load events", e),
    }
}

/// DELETE /api/catalog/:id - Remove an entry
async fn remove_entry(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let conn = state.db();

    match delete_entry(&conn, &id, ACTOR) {
        Ok(true) => (StatusCode::OK, Json(ApiResponse::ok(id))).into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, format!("No catalog entry with id {}", id)),
        Err(e) => internal_error("Failed to delete entry", e),
    }
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/catalog", get(list_entries).post(create_entry))
        .route("/catalog/:id", get(show_entry).delete(remove_entry))
        .route("/catalog/:id/events", get(entry_events))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let db_path = std::env::var("CURATOR_DB").unwrap_or_else(|_| "catalog.db".to_string());
    let addr = std::env::var("CURATOR_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let config = CurationConfig::resolve(None)?;
    let pipeline = CurationPipeline::new(config)?;

    let conn = open_database(&db_path)?;
    let existing = get_all_entries(&conn).context("Failed to load catalog")?;
    pipeline.rebuild_from_catalog(&existing);
    info!(db = %db_path, entries = existing.len(), "Catalog opened");

    let state = AppState {
        db: Arc::new(Mutex::new(conn)),
        pipeline: Arc::new(pipeline),
    };

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(addr = %addr, "Server running (API under /api)");

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}
