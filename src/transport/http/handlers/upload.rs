use std::path::{Path, PathBuf};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rand::RngCore;

use crate::transport::http::types::{ApiResponse, AppState};

/// Removes the spooled upload on every exit path of the handler.
struct TempUpload {
    path: PathBuf,
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                eprintln!(
                    "> Could not remove spooled upload {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Strips any path components a client may have put in the file name.
fn sanitize_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload.bin")
        .to_string()
}

#[utoipa::path(
    post,
    path = "/api/pinata/upload-text",
    responses(
        (status = 200, description = "Pinning service response, passed through verbatim"),
        (status = 400, description = "No file provided or malformed multipart body", body = ApiResponse),
        (status = 502, description = "Pinning service unreachable", body = ApiResponse)
    )
)]
pub async fn upload_text_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut display_name: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::err(format!("Malformed multipart body: {}", e))),
                )
                    .into_response();
            }
        };
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(sanitize_file_name)
                    .unwrap_or_else(|| "upload.bin".to_string());
                match field.bytes().await {
                    Ok(bytes) => file = Some((file_name, bytes.to_vec())),
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ApiResponse::err(format!("Could not read file part: {}", e))),
                        )
                            .into_response();
                    }
                }
            }
            Some("name") => {
                display_name = field.text().await.ok();
            }
            _ => {}
        }
    }

    // Missing file part is a client error; no upstream call is made.
    let Some((file_name, bytes)) = file else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::err("No file provided")),
        )
            .into_response();
    };

    // Spool to disk, forward the spooled copy, delete on every exit path.
    if let Err(e) = tokio::fs::create_dir_all(&state.upload_tmp_dir).await {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::err(format!("Could not create spool dir: {}", e))),
        )
            .into_response();
    }
    let mut tag = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut tag);
    let spool_path = state
        .upload_tmp_dir
        .join(format!("{}-{}", hex::encode(tag), file_name));
    if let Err(e) = tokio::fs::write(&spool_path, &bytes).await {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::err(format!("Could not spool upload: {}", e))),
        )
            .into_response();
    }
    let _cleanup = TempUpload {
        path: spool_path.clone(),
    };
    let spooled = match tokio::fs::read(&spool_path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::err(format!("Could not read spooled upload: {}", e))),
            )
                .into_response();
        }
    };

    match state
        .pinning
        .pin_file_raw(spooled, &file_name, display_name.as_deref())
        .await
    {
        // Pass the upstream status and body through verbatim.
        Ok((status, body)) => (
            StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
            Json(body),
        )
            .into_response(),
        Err(e) => {
            eprintln!("> Pinning upload error: {:#}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::err(format!("Pinning service unreachable: {:#}", e))),
            )
                .into_response()
        }
    }
}
