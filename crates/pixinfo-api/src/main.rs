use std::sync::Arc;

use pixinfo_api::state::AppState;
use pixinfo_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    pixinfo_api::telemetry::init_telemetry();

    // Build shared state and routes
    let state = Arc::new(AppState::new(config.clone()));
    let router = pixinfo_api::setup::routes::setup_routes(&config, state)?;

    // Start the server
    pixinfo_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
