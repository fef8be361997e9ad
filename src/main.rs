use aufbau::config::Config;
use aufbau::http::{AppState, HttpServer};
use aufbau::store;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Aufbau API v{}", aufbau::version());

    let config = Config::from_env();
    let document_store = store::connect(&config).await;

    let state = AppState::new(document_store.clone(), &config);
    let server = HttpServer::new(state, config.port);
    server.start().await?;

    if let Some(document_store) = document_store {
        document_store.close().await?;
        info!("Document store closed");
    }

    Ok(())
}
