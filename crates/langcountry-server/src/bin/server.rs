//! LangCountry server binary

use anyhow::Result;
use langcountry_common_config::{ConfigLoader, Environment};
use langcountry_common_log::LogConfig;
use langcountry_server::Server;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    Environment::init()?;
    langcountry_common_log::init(LogConfig::from_env())?;

    let loader = ConfigLoader::from_env();
    let config = loader.load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %loader.config_path().display(),
        fallback = %config.fallback,
        "starting LangCountry server"
    );

    let server = Server::new(config)?;
    server.run().await?;

    info!("server shutdown complete");
    Ok(())
}
