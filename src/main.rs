//! Tileboard service binary.

use std::sync::Arc;

use tokio::net::TcpListener;

use tileboard::config::loader::DefaultConfigRepository;
use tileboard::config::usecase::ConfigUsecase;
use tileboard::http::HttpServer;
use tileboard::monitorables;
use tileboard::observability;
use tileboard::registry::TileRegistry;
use tileboard::settings::Settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();

    let settings = Settings::from_env();
    tracing::info!(
        bind_address = %settings.bind_address,
        named_configs = settings.named_configs.len(),
        "configuration loaded"
    );

    let mut registry = TileRegistry::new();
    monitorables::register_all(&mut registry, &settings.monitorables);
    tracing::info!(
        tile_types = registry.tile_types().len(),
        generator_types = registry.generator_types().len(),
        "tile registry initialised"
    );

    let usecase = Arc::new(ConfigUsecase::new(
        Arc::new(DefaultConfigRepository::new()),
        Arc::new(registry),
        settings.named_configs.clone(),
    ));

    let listener = TcpListener::bind(&settings.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    HttpServer::new(usecase, &settings).run(listener).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
