use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classdrive::config::Config;
use classdrive::drive::{GoogleDrive, RemoteDrive};
use classdrive::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classdrive=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ClassDrive...");

    // Load configuration
    let config = Config::load()?;
    let config = Arc::new(config);
    tracing::info!("Configuration loaded");

    // Initialize the Drive adapter
    let drive: Arc<dyn RemoteDrive> = Arc::new(GoogleDrive::new(&config.google)?);

    // Create app state
    let state = AppState {
        config: config.clone(),
        drive,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
