pub mod mail;
pub mod turnstile;
