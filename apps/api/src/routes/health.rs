use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service name and version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
