//! HTTP API - one endpoint group per entity
//!
//! Every response body is JSON; failures carry an `error` key. Endpoint
//! groups catch store failures at their own boundary and convert them to
//! status codes - nothing propagates unhandled.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::storage::RecordStore;

pub mod anhang;
pub mod kontakt;
pub mod products;

/// Server state. The record store is an explicitly injected capability,
/// shared across the endpoint groups behind one lock.
pub struct AppState {
    pub store: Mutex<RecordStore>,
}

/// Error body for every failure response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/api/products", get(products::list_products))
        .route("/api/products/{id}", get(products::get_product))
        .route(
            "/api/kontakt",
            get(kontakt::list_contacts).post(kontakt::create_contact),
        )
        .route(
            "/api/kontakt/{id}",
            get(kontakt::get_contact)
                .put(kontakt::update_contact)
                .delete(kontakt::delete_contact),
        )
        .route(
            "/api/anhang",
            get(anhang::list_attachments).post(anhang::create_attachment),
        )
        .route(
            "/api/anhang/{id}",
            get(anhang::get_attachment)
                .put(anhang::update_attachment)
                .delete(anhang::delete_attachment),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the store and serve the API until shutdown
pub async fn start_server(port: u16, database_path: &Path) -> anyhow::Result<()> {
    let store = RecordStore::open(database_path)?;
    let state = Arc::new(AppState {
        store: Mutex::new(store),
    });
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Home endpoint - service description
pub async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to mobsys",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/": "Home",
            "/health": "Health check",
            "/api/products": "Products (read-only)",
            "/api/kontakt": "Contacts",
            "/api/anhang": "Attachments"
        }
    }))
}

/// Health check endpoint - pings the record store
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let store = state.store.lock().await;
    match store.ping() {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"status": "healthy", "database": "connected"})),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"status": "unhealthy", "error": e.to_string()})),
        ),
    }
}
