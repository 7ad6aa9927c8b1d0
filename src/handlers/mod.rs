//! HTTP handlers for companies, invoices and industries
//!
//! Handlers validate the body shape, call the injected store and wrap the
//! result in the response envelope of each resource. Errors are returned as
//! [`BizError`](crate::core::BizError), which renders itself as a JSON error
//! body with the matching status.

pub mod companies;
pub mod industries;
pub mod invoices;

use crate::core::BizStore;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BizStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BizStore>) -> Self {
        Self { store }
    }
}

/// `{"message": "..."}` body returned by deletes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn deleted() -> Json<Self> {
        Json(Self {
            message: "deleted".to_string(),
        })
    }
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
