use formrelay_cache_contracts::KvStore;
use formrelay_config::Config;
use formrelay_di::Provide;
use formrelay_email_contracts::EmailService;
use tracing::info;

use crate::{
    cache, email,
    environment::{types::RestServer, ConfigProvider, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Connecting to valkey cache");
    let cache = cache::connect(&config.cache).await?;
    cache.ping().await?;

    info!("Authenticating against the mail API");
    let email = email::build(&config.email)?;
    email.ping().await?;

    let config_provider = ConfigProvider::new(&config);
    let mut provider = Provider::new(config_provider, cache, email);
    let server: RestServer = provider.provide();
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
