use crate::transport::http::handlers::{auth, health, upload};
use crate::transport::http::types::{
    ApiResponse, AppState, ChallengeRequest, ChallengeResponse, VerifyRequest,
};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        upload::upload_text_handler,
        auth::auth_challenge_handler,
        auth::auth_verify_handler
    ),
    components(schemas(ApiResponse, ChallengeRequest, ChallengeResponse, VerifyRequest))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::healthcheck_handler))
        .route("/api/pinata/upload-text", post(upload::upload_text_handler))
        .route("/api/auth/challenge", post(auth::auth_challenge_handler))
        .route("/api/auth/verify", post(auth::auth_verify_handler))
        .with_state(app_state)
}
