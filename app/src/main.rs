mod asset;
mod config;
mod error;
mod logging;
mod models;
mod pot;
mod rest;

use std::error::Error;
use tracing::{error, info};

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn Error>> {
    logging::init_logging();

    let config = config::Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let store = models::connect(&config).await?;
    let assets = asset::connect(&config)?;
    let default_image = asset::default_image(config.default_image_path())?;
    let service = pot::PotService::new(
        store.clone(),
        assets,
        default_image,
        config.timezone(),
        config.readings_window(),
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed listening for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received ctrl-c, shutting down");
    };
    rest::dispatch_server_daemon(service, config.bind_addr(), config.max_image_bytes(), shutdown)
        .await?;

    store.close().await;
    info!("Document store closed");
    Ok(())
}
