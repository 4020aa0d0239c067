use std::sync::LazyLock;

use formrelay_models::{contact::Language, email_domain::is_common_consumer_domain};
use regex::Regex;

/// Accepts the `local@domain.tld` shape; everything stricter is left to the
/// server.
static EMAIL_FORMAT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailValidation {
    pub is_valid: bool,
    pub is_consumer_email: bool,
    pub message: Option<&'static str>,
}

/// Validates an email address for business use.
///
/// Checks the structural shape first, then whether the domain belongs to a
/// known consumer mail provider. All outcomes are represented in the returned
/// value; consumer addresses get a localized nudge towards a company address.
pub fn validate_business_email(email: &str, language: Language) -> EmailValidation {
    let email = email.trim();

    if !EMAIL_FORMAT_REGEX.is_match(email) {
        return EmailValidation {
            is_valid: false,
            is_consumer_email: false,
            message: Some(invalid_format_message(language)),
        };
    }

    let domain = email.split('@').nth(1).unwrap_or_default();
    if is_common_consumer_domain(domain) {
        return EmailValidation {
            is_valid: false,
            is_consumer_email: true,
            message: Some(consumer_email_message(language)),
        };
    }

    EmailValidation {
        is_valid: true,
        is_consumer_email: false,
        message: None,
    }
}

fn invalid_format_message(language: Language) -> &'static str {
    match language {
        Language::En => "Please enter a valid email address.",
        Language::No => "Vennligst oppgi en gyldig e-postadresse.",
    }
}

fn consumer_email_message(language: Language) -> &'static str {
    match language {
        Language::En => "Please use your company email address.",
        Language::No => "Vennligst bruk din bedrifts-e-postadresse.",
    }
}

/// Generic failure message shown when a submission fails without a
/// server-provided reason.
pub(crate) fn generic_error_message(language: Language) -> &'static str {
    match language {
        Language::En => "Something went wrong. Please try again.",
        Language::No => "Noe gikk galt. Vennligst prøv igjen.",
    }
}
