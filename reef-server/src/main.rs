use reef_server::{Config, Server, init_logger_with_file};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file before reading any configuration
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    init_logger_with_file(config.log_dir.as_deref());

    tracing::info!(
        "Starting reef-server (env: {}, port: {})",
        config.environment,
        config.http_port
    );

    let server = Server::new(config);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        return Err(e);
    }

    Ok(())
}
