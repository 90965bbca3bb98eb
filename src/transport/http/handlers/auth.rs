use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ethers::types::Address;

use crate::transport::http::types::{
    ApiResponse, AppState, ChallengeRequest, ChallengeResponse, VerifyRequest,
};

#[utoipa::path(
    post,
    path = "/api/auth/challenge",
    request_body = ChallengeRequest,
    responses(
        (status = 200, description = "Challenge issued", body = ChallengeResponse),
        (status = 400, description = "Invalid address", body = ApiResponse)
    )
)]
pub async fn auth_challenge_handler(
    State(state): State<AppState>,
    Json(request): Json<ChallengeRequest>,
) -> impl IntoResponse {
    let address: Address = match request.address.parse() {
        Ok(a) => a,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::err("Invalid Ethereum address")),
            )
                .into_response();
        }
    };
    let message = state.challenges.issue(address).await;
    (
        StatusCode::OK,
        Json(ChallengeResponse {
            address: format!("{:#x}", address),
            message,
        }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Signature verified; caller controls the address", body = ApiResponse),
        (status = 400, description = "Invalid address", body = ApiResponse),
        (status = 401, description = "Verification failed", body = ApiResponse)
    )
)]
pub async fn auth_verify_handler(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> impl IntoResponse {
    let address: Address = match request.address.parse() {
        Ok(a) => a,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::err("Invalid Ethereum address")),
            )
                .into_response();
        }
    };
    match state.challenges.verify(address, &request.signature).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(serde_json::json!({
                    "address": format!("{:#x}", address),
                    "verified": true
                })),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::err(format!("{:#}", e))),
        )
            .into_response(),
    }
}
