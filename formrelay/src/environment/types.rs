use formrelay_cache_valkey::ValkeyStore;
use formrelay_core_contact_impl::{
    consumer_log::ContactConsumerLogServiceImpl, rate_limit::ContactRateLimitServiceImpl,
    ContactServiceImpl,
};
use formrelay_core_health_impl::HealthServiceImpl;
use formrelay_email_impl::EmailServiceImpl;
use formrelay_extern_impl::turnstile::TurnstileApiServiceImpl;
use formrelay_shared_impl::{captcha::CaptchaServiceImpl, time::TimeServiceImpl};

// API
pub type RestServer = formrelay_api_rest::RestServer<Health, Contact>;

// Cache
pub type Cache = ValkeyStore;

// Email
pub type Email = EmailServiceImpl;

// Extern
pub type TurnstileApi = TurnstileApiServiceImpl;

// Shared
pub type Captcha = CaptchaServiceImpl<TurnstileApi>;
pub type Time = TimeServiceImpl;

// Core
pub type Health = HealthServiceImpl<Time, Cache, Email>;

pub type Contact = ContactServiceImpl<ContactRateLimit, Captcha, Email, ContactConsumerLog>;
pub type ContactRateLimit = ContactRateLimitServiceImpl<Time, Cache>;
pub type ContactConsumerLog = ContactConsumerLogServiceImpl<Time, Cache>;
