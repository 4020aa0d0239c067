use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{File, FileFormat};
use email_address::EmailAddress;
use serde::Deserialize;
use url::Url;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Loads the configuration from the paths in the `FORMRELAY_CONFIG`
/// environment variable (colon separated, later files override earlier ones)
/// or from [`DEFAULT_CONFIG_PATH`].
pub fn load() -> anyhow::Result<Config> {
    let paths = match std::env::var("FORMRELAY_CONFIG") {
        Ok(var) => var.split(':').map(PathBuf::from).collect(),
        Err(_) => vec![PathBuf::from(DEFAULT_CONFIG_PATH)],
    };
    load_paths(&paths)
}

pub fn load_paths(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub cache: CacheConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub health: HealthConfig,
    pub turnstile: Option<TurnstileConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub real_ip: Option<RealIpConfig>,
}

/// Trust settings for client IP extraction behind a reverse proxy.
#[derive(Debug, Deserialize)]
pub struct RealIpConfig {
    /// Header carrying the real client IP (e.g. `X-Real-Ip`).
    pub header: String,
    /// The header is only honored if the direct peer is this address.
    pub set_from: IpAddr,
}

#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

/// Credentials and endpoints for the Graph-style mail API.
#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    /// Mailbox the relay sends from.
    pub sender: EmailAddress,
    pub token_endpoint_override: Option<Url>,
    pub send_endpoint_override: Option<Url>,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    /// Mailbox contact form submissions are relayed to.
    pub recipient: EmailAddress,
    pub rate_limit: RateLimitConfig,
    pub consumer_log_retention: Duration,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u64,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct TurnstileConfig {
    pub secret: String,
    pub siteverify_endpoint_override: Option<Url>,
}
