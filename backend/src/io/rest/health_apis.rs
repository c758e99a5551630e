use axum::{http::StatusCode, response::IntoResponse, Json};
use shared::HealthResponse;

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
}
