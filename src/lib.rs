pub mod analysis;
pub mod api;
pub mod config;
pub mod core_state;
pub mod session;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use analysis::{GeminiAnalysisClient, GeminiClient, RetryingBackend};
use config::AppConfig;
use core_state::CoreState;

/// Process entry point. Returns the exit code.
pub fn run() -> i32 {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return 1;
        }
    };
    tracing::debug!(?config, "Configuration loaded");

    // The blocking HTTP client must be built before the async runtime exists.
    let gemini = match GeminiClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize Gemini client");
            return 1;
        }
    };
    tracing::info!(model = gemini.model(), "Gemini client ready");

    let backend = RetryingBackend::new(gemini, config.max_retries, config.retry_base_ms);
    let client = GeminiAnalysisClient::new(Arc::new(backend));
    let core = Arc::new(CoreState::new(Arc::new(client)));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start async runtime");
            return 1;
        }
    };

    runtime.block_on(serve(core, config.bind_addr))
}

async fn serve(core: Arc<CoreState>, bind_addr: std::net::SocketAddr) -> i32 {
    let server = match api::start_api_server(core, bind_addr).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "API server failed to start");
            return 1;
        }
    };
    tracing::info!(addr = %server.local_addr(), "Listening on http://{}/api/", server.local_addr());

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    server.stop().await;
    0
}
