use anyhow::Context;
use formrelay_config::EmailConfig;
use formrelay_email_impl::{EmailServiceConfig, EmailServiceImpl};

/// Build the mail API client
pub fn build(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    EmailServiceImpl::new(EmailServiceConfig {
        tenant_id: config.tenant_id.clone(),
        client_id: config.client_id.clone(),
        client_secret: config.client_secret.clone(),
        sender: config.sender.clone(),
        token_endpoint_override: config.token_endpoint_override.clone(),
        send_endpoint_override: config.send_endpoint_override.clone(),
    })
    .context("Failed to initialize mail API client")
}
