//! URL scheme safety: safe/blocked/unknown classification plus per-scheme
//! content checks. Unknown schemes fail closed.

use crate::policy::SchemePolicy;
use navguard_types::{Reason, SchemeClass, ValidationResult, ids};
use percent_encoding::percent_decode_str;
use url::{ParseError, Url};

pub const DEFAULT_SAFE_SCHEMES: &[&str] =
    &["http", "https", "file", "data", "about", "blob", "content"];

pub const DEFAULT_BLOCKED_SCHEMES: &[&str] = &["javascript", "vbscript", "jar", "wyciwyg"];

/// Tokens rejected anywhere in the raw URL string by the prefilter.
pub const DANGEROUS_PATTERNS: &[&str] = &[
    "javascript:",
    "vbscript:",
    "data:text/html",
    "<script",
    "onerror=",
    "onload=",
];

/// Markup that makes a `data:` URL active content.
const DATA_URL_MARKERS: &[&str] = &["javascript:", "<script", "onerror=", "onload="];

pub fn validate(policy: &SchemePolicy, input: &str) -> ValidationResult {
    if let Some(custom) = policy.custom_validator() {
        let result = (**custom)(input);
        if !result.is_allowed() {
            return result;
        }
    }

    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => {
            return ValidationResult::deny(Reason::new(ids::CODE_URL_NO_SCHEME, "URL has no scheme"));
        }
        Err(err) => {
            return ValidationResult::deny(Reason::new(
                ids::CODE_URL_INVALID,
                format!("Invalid URL format: {err}"),
            ));
        }
    };

    let scheme = url.scheme();
    match policy.classify(scheme) {
        SchemeClass::Blocked => ValidationResult::deny(Reason::new(
            ids::CODE_URL_BLOCKED_SCHEME,
            format!("URL scheme '{scheme}' is blocked for security reasons"),
        )),
        SchemeClass::Safe => check_safe_scheme(scheme, input),
        SchemeClass::Unknown => ValidationResult::deny(Reason::new(
            ids::CODE_URL_UNKNOWN_SCHEME,
            format!("URL scheme '{scheme}' is not in the safe schemes list"),
        )),
    }
}

/// Reject any URL containing a [`DANGEROUS_PATTERNS`] token (case-insensitive),
/// then run [`validate`].
pub fn validate_with_pattern_prefilter(policy: &SchemePolicy, input: &str) -> ValidationResult {
    let lower = input.to_lowercase();
    if let Some(pattern) = DANGEROUS_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return ValidationResult::deny(Reason::new(
            ids::CODE_URL_DANGEROUS_PATTERN,
            format!("URL string contains potentially malicious pattern: {pattern}"),
        ));
    }
    validate(policy, input)
}

fn check_safe_scheme(scheme: &str, input: &str) -> ValidationResult {
    match scheme {
        // Listing `javascript` as safe does not make it executable.
        "javascript" => ValidationResult::deny(Reason::new(
            ids::CODE_URL_JAVASCRIPT,
            "JavaScript execution via URL is not allowed",
        )),
        "file" => check_file_path(&raw_path(input)),
        "data" => check_data_content(input),
        _ => ValidationResult::allow(),
    }
}

fn check_file_path(path: &str) -> ValidationResult {
    if path.contains("../") || path.contains("..\\") {
        return ValidationResult::deny(Reason::new(
            ids::CODE_URL_FILE_TRAVERSAL,
            "File URL contains directory traversal patterns",
        ));
    }
    if path.match_indices("//").any(|(i, _)| i > 0) {
        return ValidationResult::deny(Reason::new(
            ids::CODE_URL_FILE_SUSPICIOUS_PATH,
            "File URL contains suspicious path patterns",
        ));
    }
    ValidationResult::allow()
}

fn check_data_content(input: &str) -> ValidationResult {
    let lower = input.to_lowercase();
    if DATA_URL_MARKERS.iter().any(|m| lower.contains(*m)) {
        return ValidationResult::deny(Reason::new(
            ids::CODE_URL_DATA_MALICIOUS,
            "Data URL contains potentially malicious content",
        ));
    }
    ValidationResult::allow()
}

/// Path of a URL as a consumer would open it, before dot-segment
/// normalization.
///
/// Tab, CR and LF are dropped the way URL parsers drop them, then the path is
/// percent-decoded. `Url` itself resolves `..` and rewrites `\` while
/// parsing, which would hide the very patterns the file checks look for.
fn raw_path(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
        .collect();
    let after_scheme = cleaned
        .split_once(':')
        .map_or(cleaned.as_str(), |(_, rest)| rest);
    let path = match after_scheme.strip_prefix("//") {
        Some(authority_and_path) => authority_and_path
            .find(['/', '\\'])
            .map_or("", |i| &authority_and_path[i..]),
        None => after_scheme,
    };
    let end = path.find(['?', '#']).unwrap_or(path.len());
    percent_decode_str(&path[..end])
        .decode_utf8_lossy()
        .into_owned()
}
