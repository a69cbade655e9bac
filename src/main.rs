use culinary_compass::{config::Config, server::CompassMcpServer};
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Using recipe API at {}", config.api_url);
    match &config.token_file {
        Some(path) => tracing::info!("Persisting session token in {}", path.display()),
        None => tracing::info!("COMPASS_TOKEN_FILE not set, session token kept in memory only"),
    }

    // All connections share one client, and with it one auth context
    let api = config.build_api();
    let server = CompassMcpServer::new(api.client().clone()).with_asset_url(config.asset_url.clone());

    if api.auth().is_authenticated() {
        tracing::info!("Restored a stored session token");
    }

    tracing::info!("Testing recipe API access...");
    match server.test_api_access().await {
        Ok(count) => {
            tracing::info!("Recipe API reachable, {} recipes available", count);
        }
        Err(e) => {
            tracing::warn!("Recipe API access test failed: {}", e);
            tracing::warn!("Please verify:");
            tracing::warn!("  - COMPASS_API_URL is correct: {}", config.api_url);
            tracing::warn!("  - the recipe backend is running and accessible");
            tracing::warn!("The server will continue, but tools will report errors until the API is reachable.");
        }
    }

    let sse_config = SseServerConfig {
        bind: config.bind_addr.parse()?,
        sse_path: "/sse".to_string(),
        post_path: "/message".to_string(),
        ct: tokio_util::sync::CancellationToken::new(),
        sse_keep_alive: None,
    };

    tracing::info!("Culinary Compass MCP Server listening on {}", sse_config.bind);

    // serve_with_config handles binding, axum server setup, and graceful shutdown internally
    let sse_server = SseServer::serve_with_config(sse_config).await?;
    let ct = sse_server.with_service(move || server.clone());

    tracing::info!("Culinary Compass MCP Server started successfully");

    // Wait for Ctrl+C
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    ct.cancel();

    Ok(())
}
