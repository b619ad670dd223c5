//! HTTP handlers

pub mod report;
pub mod summary;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// Every path the service answers
pub const ENDPOINTS: [&str; 3] = ["/summary", "/report/sales", "/report/salaries"];

/// Fallback for unknown paths
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": "Endpoint not found. Try one of the valid endpoints:",
            "endpoints": ENDPOINTS,
        })),
    )
}
