mod api_doc;
mod error;
mod handlers;
mod setup;
mod state;
mod telemetry;

use std::sync::Arc;

use vidgate_core::Config;
use vidgate_services::CleanupService;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    telemetry::init_telemetry();

    // Shared sweep directory must exist before the first request or sweep
    tokio::fs::create_dir_all(config.download_dir()).await?;

    let state = Arc::new(state::AppState::new(config.clone()));

    // Background sweeper: safety net for temp files the request path missed
    let cleanup = Arc::new(CleanupService::new(
        config.download_dir().to_path_buf(),
        config.retention_window(),
        config.cleanup_interval(),
    ));
    let _cleanup_handle = cleanup.start();

    let router = setup::routes::setup_routes(&config, state)?;

    setup::server::start_server(&config, router).await?;

    Ok(())
}
