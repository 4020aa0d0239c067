use std::sync::Arc;

use formrelay_api_rest::{RestServerConfig, RestServerRealIpConfig};
use formrelay_config::Config;
use formrelay_core_contact_impl::{
    consumer_log::ContactConsumerLogConfig, rate_limit::ContactRateLimitConfig,
    ContactServiceConfig,
};
use formrelay_core_health_impl::HealthServiceConfig;
use formrelay_di::provider;
use formrelay_extern_impl::turnstile::TurnstileApiServiceConfig;
use formrelay_shared_impl::captcha::{CaptchaServiceConfig, TurnstileCaptchaServiceConfig};
use types::{Cache, Email};

pub mod types;

provider! {
    /// The default provider, capable of providing all the dependencies
    pub Provider {
        cache: Cache,
        email: Email,
        ..config: ConfigProvider {
            // API
            RestServerConfig,

            // Extern
            TurnstileApiServiceConfig,

            // Shared
            CaptchaServiceConfig,

            // Core
            ContactServiceConfig,
            ContactRateLimitConfig,
            ContactConsumerLogConfig,
            HealthServiceConfig,
        }
    }
}

impl Provider {
    pub fn new(config: ConfigProvider, cache: Cache, email: Email) -> Self {
        Self {
            _cache: Default::default(),
            cache,
            email,
            config,
        }
    }
}

provider! {
    /// Reduced provider, capable of providing services that only depend on the configuration
    pub ConfigProvider {
        rest_server_config: RestServerConfig,
        turnstile_api_service_config: TurnstileApiServiceConfig,
        captcha_service_config: CaptchaServiceConfig,
        contact_service_config: ContactServiceConfig,
        contact_rate_limit_config: ContactRateLimitConfig,
        contact_consumer_log_config: ContactConsumerLogConfig,
        health_service_config: HealthServiceConfig,
    }
}

impl ConfigProvider {
    pub fn new(config: &Config) -> Self {
        // API
        let rest_server_config = RestServerConfig {
            real_ip_config: config.http.real_ip.as_ref().map(|real_ip_config| {
                Arc::new(RestServerRealIpConfig {
                    header: real_ip_config.header.clone(),
                    set_from: real_ip_config.set_from,
                })
            }),
        };

        // Extern
        let turnstile_api_service_config = TurnstileApiServiceConfig::new(
            config
                .turnstile
                .as_ref()
                .and_then(|turnstile| turnstile.siteverify_endpoint_override.clone()),
        );

        // Shared
        let captcha_service_config = match config.turnstile.as_ref() {
            Some(turnstile) => CaptchaServiceConfig::Turnstile(TurnstileCaptchaServiceConfig {
                secret: turnstile.secret.clone().into(),
            }),
            None => CaptchaServiceConfig::Disabled,
        };

        // Core
        let contact_service_config = ContactServiceConfig {
            recipient: Arc::new(config.contact.recipient.clone()),
        };

        let contact_rate_limit_config = ContactRateLimitConfig {
            window: config.contact.rate_limit.window.into(),
            max_requests: config.contact.rate_limit.max_requests,
        };

        let contact_consumer_log_config = ContactConsumerLogConfig {
            retention: config.contact.consumer_log_retention.into(),
        };

        let health_service_config = HealthServiceConfig {
            cache_ttl: config.health.cache_ttl.into(),
        };

        Self {
            _cache: Default::default(),
            rest_server_config,
            turnstile_api_service_config,
            captcha_service_config,
            contact_service_config,
            contact_rate_limit_config,
            contact_consumer_log_config,
            health_service_config,
        }
    }
}
