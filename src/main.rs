use rental_ledger::api::{AppState, create_router};
use rental_ledger::config::ConfigLoader;
use rental_ledger::logging;

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "LEDGER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config/ledger.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = ConfigLoader::load(&path)?;

    logging::init(config.logging());

    let bind_address = config.server().bind_address.clone();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(config = %path, bind_address = %bind_address, "Rental ledger listening");

    axum::serve(listener, create_router(AppState::new(config))).await?;
    Ok(())
}
