use serde::Serialize;
use axum::Json;
use chrono::Utc;

/// Envelope used by the analysis endpoints. The scrape endpoint returns its
/// body bare because downstream consumers expect that exact shape.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: T,
    pub timestamp: String,
}

pub fn success<T: Serialize>(message: impl Into<String>, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        status: "success".to_string(),
        message: message.into(),
        data,
        timestamp: Utc::now().to_rfc3339(),
    })
}
