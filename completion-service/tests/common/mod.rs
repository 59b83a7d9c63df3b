use completion_service::config::ServiceConfig;
use completion_service::startup::Application;
use std::path::PathBuf;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub log_dir: PathBuf,
}

impl TestApp {
    /// Spawns the application in fallback mode (no upstream backend).
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawns the application with the given upstream backend base URL.
    pub async fn spawn_with_upstream(url: &str) -> Self {
        let url = url.to_string();
        Self::spawn_with(move |config| {
            config.upstream.url = Some(url);
        })
        .await
    }

    /// Spawns the application on a random port with a unique scratch log
    /// directory, applying `customize` to the configuration first.
    pub async fn spawn_with(customize: impl FnOnce(&mut ServiceConfig)) -> Self {
        std::env::set_var("ENVIRONMENT", "test");

        let log_dir = PathBuf::from(format!("target/test-logs-{}", Uuid::new_v4()));

        let mut config = ServiceConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.logs.dir = log_dir.clone();
        config.upstream.url = None;
        config.upstream.model = "mistral".to_string();
        customize(&mut config);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            log_dir,
        }
    }

    /// Path of the operational log file this app writes.
    pub fn operational_log_path(&self) -> PathBuf {
        self.log_dir
            .join(completion_service::config::OPERATIONAL_LOG_FILE)
    }

    /// Path of the completion-history file this app writes.
    pub fn completion_log_path(&self) -> PathBuf {
        self.log_dir
            .join(completion_service::config::COMPLETION_LOG_FILE)
    }

    /// Cleanup test resources (scratch log directory).
    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.log_dir).await;
    }
}

/// Returns a local base URL that nothing is listening on.
pub fn refused_upstream_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe port");
    let port = listener.local_addr().expect("Failed to read probe port").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
