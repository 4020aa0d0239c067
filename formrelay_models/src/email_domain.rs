//! Classification of email domains operated by public consumer mail
//! providers, as opposed to company-owned domains.

use std::{collections::HashSet, sync::LazyLock};

/// Consumer domains checked by form clients for instant feedback.
///
/// Deliberately small so clients can nudge towards a work email without
/// shipping the whole canonical list; [`CONSUMER_EMAIL_DOMAINS`] stays
/// authoritative on the server.
pub const COMMON_CONSUMER_EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "live.com",
    "aol.com",
    "icloud.com",
    "protonmail.com",
    "proton.me",
    "online.no",
];

/// The canonical consumer domain list used for server-side decisions.
pub const CONSUMER_EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "yahoo.com",
    "yahoo.co.uk",
    "yahoo.no",
    "ymail.com",
    "hotmail.com",
    "hotmail.co.uk",
    "hotmail.no",
    "outlook.com",
    "outlook.no",
    "live.com",
    "live.no",
    "msn.com",
    "aol.com",
    "icloud.com",
    "me.com",
    "mac.com",
    "protonmail.com",
    "proton.me",
    "pm.me",
    "gmx.com",
    "gmx.net",
    "gmx.de",
    "mail.com",
    "mail.ru",
    "yandex.com",
    "yandex.ru",
    "zoho.com",
    "fastmail.com",
    "tutanota.com",
    "tuta.io",
    "hey.com",
    // Norwegian consumer providers
    "online.no",
    "start.no",
    "getmail.no",
    "frisurf.no",
    "c2i.net",
    "broadpark.no",
    "altibox.no",
];

static COMMON_SET: LazyLock<HashSet<&str>> =
    LazyLock::new(|| COMMON_CONSUMER_EMAIL_DOMAINS.iter().copied().collect());

static CANONICAL_SET: LazyLock<HashSet<&str>> =
    LazyLock::new(|| CONSUMER_EMAIL_DOMAINS.iter().copied().collect());

/// Returns whether `domain` is in the fast-feedback consumer subset.
///
/// Unknown domains classify as not-consumer.
pub fn is_common_consumer_domain(domain: &str) -> bool {
    COMMON_SET.contains(domain.to_ascii_lowercase().as_str())
}

/// Returns whether `domain` is in the canonical consumer domain list.
///
/// Unknown domains classify as not-consumer.
pub fn is_consumer_domain(domain: &str) -> bool {
    CANONICAL_SET.contains(domain.to_ascii_lowercase().as_str())
}
