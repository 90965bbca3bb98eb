use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::domain::auth::ChallengeStore;
use crate::infra::pinning::PinningClient;

#[derive(Clone)]
pub struct AppState {
    pub pinning: Arc<PinningClient>,
    pub challenges: Arc<ChallengeStore>,
    /// Directory where uploads are spooled before being forwarded.
    pub upload_tmp_dir: PathBuf,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ChallengeRequest {
    /// Claimed wallet address (0x-prefixed hex).
    pub address: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ChallengeResponse {
    pub address: String,
    /// Message the wallet must sign (EIP-191 personal_sign).
    pub message: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct VerifyRequest {
    pub address: String,
    /// 65-byte signature over the challenge message, hex encoded.
    pub signature: String,
}
