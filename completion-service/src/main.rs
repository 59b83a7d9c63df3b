use completion_service::config::ServiceConfig;
use completion_service::startup::Application;
use service_common::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = ServiceConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(&config.common.log_level);

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start service: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    tracing::info!("Completion gateway listening on port {}", app.port());

    app.run_until_stopped().await
}
