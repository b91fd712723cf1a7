//! HTTPS enforcement: allow, upgrade, or block plain-HTTP URLs.

use crate::policy::HttpsPolicy;
use navguard_types::{HttpsStrategy, Reason, ValidationResult, ids};
use url::{ParseError, Url};

const DEFAULT_HTTP_PORT: u16 = 80;

pub fn validate(policy: &HttpsPolicy, input: &str) -> ValidationResult {
    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => {
            return ValidationResult::deny(Reason::new(
                ids::CODE_HTTPS_NO_SCHEME,
                "No scheme specified",
            ));
        }
        Err(_) => {
            return ValidationResult::deny(Reason::new(
                ids::CODE_HTTPS_INVALID_URL,
                "Invalid URL format",
            ));
        }
    };

    // `Url` lowercases the scheme while parsing.
    match url.scheme() {
        "https" => ValidationResult::allow(),
        "http" => validate_http(policy, &url),
        // Other schemes are the URL safety validator's concern.
        _ => ValidationResult::allow(),
    }
}

fn validate_http(policy: &HttpsPolicy, url: &Url) -> ValidationResult {
    if let Some(host) = url.host_str()
        && policy.is_whitelisted(host)
    {
        return ValidationResult::allow_with_note(Reason::new(
            ids::CODE_HTTPS_HOST_WHITELISTED,
            "Host is whitelisted for HTTP",
        ));
    }

    match policy.strategy {
        HttpsStrategy::Disabled => ValidationResult::allow(),
        HttpsStrategy::Upgrade => match upgrade_to_https(url) {
            Some(upgraded) => ValidationResult::upgraded(
                upgraded,
                Reason::new(ids::CODE_HTTPS_UPGRADED, "Upgraded HTTP to HTTPS"),
            ),
            None => ValidationResult::deny(Reason::new(
                ids::CODE_HTTPS_UPGRADE_FAILED,
                "Failed to upgrade to HTTPS",
            )),
        },
        HttpsStrategy::Strict => ValidationResult::deny(Reason::new(
            ids::CODE_HTTPS_STRICT_BLOCKED,
            "HTTP connections blocked in strict mode",
        )),
    }
}

/// Rewrite the scheme to `https`, keeping path, query and fragment.
///
/// An explicit `:80` never survives into the HTTPS authority. The result is
/// the WHATWG serialization: host lowercased, dot segments resolved, and an
/// empty path written as `/`.
fn upgrade_to_https(url: &Url) -> Option<String> {
    let mut upgraded = url.clone();
    upgraded.set_scheme("https").ok()?;
    if upgraded.port() == Some(DEFAULT_HTTP_PORT) {
        upgraded.set_port(None).ok()?;
    }
    Some(upgraded.into())
}
