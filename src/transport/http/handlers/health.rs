use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Relay is running")
    )
)]
pub async fn healthcheck_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
