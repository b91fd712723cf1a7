//! Stable identifiers for decision codes.
//!
//! A code is a dotted namespace: `<evaluator>.<snake_case discriminator>`.
//! Callers match on codes; the paired messages are advisory text only.

// Evaluators
pub const EVALUATOR_PINNING: &str = "pin";
pub const EVALUATOR_HTTPS: &str = "https";
pub const EVALUATOR_URL: &str = "url";

// Codes: pin
pub const CODE_PIN_DISABLED: &str = "pin.disabled";
pub const CODE_PIN_EMPTY_CHAIN: &str = "pin.empty_chain";
pub const CODE_PIN_NOT_PINNED: &str = "pin.not_pinned";
pub const CODE_PIN_NO_EXTRACTABLE_KEYS: &str = "pin.no_extractable_keys";
pub const CODE_PIN_MATCHED: &str = "pin.matched";
pub const CODE_PIN_MISMATCH: &str = "pin.mismatch";

// Codes: https
pub const CODE_HTTPS_INVALID_URL: &str = "https.invalid_url";
pub const CODE_HTTPS_NO_SCHEME: &str = "https.no_scheme";
pub const CODE_HTTPS_HOST_WHITELISTED: &str = "https.host_whitelisted";
pub const CODE_HTTPS_UPGRADED: &str = "https.upgraded";
pub const CODE_HTTPS_UPGRADE_FAILED: &str = "https.upgrade_failed";
pub const CODE_HTTPS_STRICT_BLOCKED: &str = "https.strict_blocked";

// Codes: url
pub const CODE_URL_INVALID: &str = "url.invalid_url";
pub const CODE_URL_NO_SCHEME: &str = "url.no_scheme";
pub const CODE_URL_BLOCKED_SCHEME: &str = "url.blocked_scheme";
pub const CODE_URL_UNKNOWN_SCHEME: &str = "url.unknown_scheme";
pub const CODE_URL_JAVASCRIPT: &str = "url.javascript_execution";
pub const CODE_URL_FILE_TRAVERSAL: &str = "url.file_traversal";
pub const CODE_URL_FILE_SUSPICIOUS_PATH: &str = "url.file_suspicious_path";
pub const CODE_URL_DATA_MALICIOUS: &str = "url.data_malicious_content";
pub const CODE_URL_DANGEROUS_PATTERN: &str = "url.dangerous_pattern";
pub const CODE_URL_CUSTOM_RULE: &str = "url.custom_rule";

/// Every code an evaluator can emit, in declaration order.
pub fn all_codes() -> &'static [&'static str] {
    &[
        CODE_PIN_DISABLED,
        CODE_PIN_EMPTY_CHAIN,
        CODE_PIN_NOT_PINNED,
        CODE_PIN_NO_EXTRACTABLE_KEYS,
        CODE_PIN_MATCHED,
        CODE_PIN_MISMATCH,
        CODE_HTTPS_INVALID_URL,
        CODE_HTTPS_NO_SCHEME,
        CODE_HTTPS_HOST_WHITELISTED,
        CODE_HTTPS_UPGRADED,
        CODE_HTTPS_UPGRADE_FAILED,
        CODE_HTTPS_STRICT_BLOCKED,
        CODE_URL_INVALID,
        CODE_URL_NO_SCHEME,
        CODE_URL_BLOCKED_SCHEME,
        CODE_URL_UNKNOWN_SCHEME,
        CODE_URL_JAVASCRIPT,
        CODE_URL_FILE_TRAVERSAL,
        CODE_URL_FILE_SUSPICIOUS_PATH,
        CODE_URL_DATA_MALICIOUS,
        CODE_URL_DANGEROUS_PATTERN,
        CODE_URL_CUSTOM_RULE,
    ]
}
