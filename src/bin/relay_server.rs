// src/bin/relay_server.rs

use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use genomic_chain::domain::auth::ChallengeStore;
use genomic_chain::infra::config;
use genomic_chain::transport;
use genomic_chain::PinningClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // --- Pinning client (holds the only copy of the credential) ---
    println!("> Initializing pinning client...");
    let pinning = Arc::new(PinningClient::from_config()?);

    // --- Challenge store for signed-message wallet verification ---
    let challenges = Arc::new(ChallengeStore::new());

    // --- Upload spool directory ---
    let upload_tmp_dir = config::upload_tmp_dir();
    tokio::fs::create_dir_all(&upload_tmp_dir).await?;
    println!("> Upload spool directory: {}", upload_tmp_dir.display());

    let app_state = transport::http::AppState {
        pinning,
        challenges,
        upload_tmp_dir,
    };

    // --- Relay server ---
    println!("> Starting relay server...");
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url(
            "/api-docs/openapi.json",
            transport::http::ApiDoc::openapi(),
        ))
        .layer(cors);
    let port = config::port();
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    println!("> Relay listening on http://0.0.0.0:{}", port);
    println!(
        "> Upload endpoint: http://localhost:{}/api/pinata/upload-text",
        port
    );
    println!("> Swagger UI available at http://localhost:{}/swagger-ui", port);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n> Shutdown signal received (Ctrl+C). Stopping relay.");
        }
    }

    Ok(())
}
