use axum::Json;
use serde_json::{json, Value};

use crate::extraction::capability;

/// GET /health
/// Returns a simple status object with service version and which PDF backends are live.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "ats-api",
        "primary_pdf_available": capability::get().primary_pdf
    }))
}
