use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use mediguide::api::server::start_server;
use mediguide::api::types::ApiContext;
use mediguide::config;
use mediguide::intake::SessionStore;
use mediguide::registry::RestRegistry;
use mediguide::routing::CaseRouter;
use mediguide::synthesis::OllamaSynthesizer;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let router = CaseRouter::new(
        Arc::new(SessionStore::new()),
        Arc::new(OllamaSynthesizer::from_env()),
        Arc::new(RestRegistry::from_env()),
    );
    let ctx = ApiContext::new(Arc::new(router));

    match start_server(ctx, &config::bind_addr()).await {
        Ok(mut server) => {
            tracing::info!(addr = %server.addr(), "ready — Ctrl-C to stop");
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for shutdown signal: {e}");
            }
            server.shutdown();
        }
        Err(e) => {
            tracing::error!("failed to start API server: {e}");
            std::process::exit(1);
        }
    }
}
