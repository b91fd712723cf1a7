//! Explain registry for decision codes.
//!
//! Maps decision codes to operator-facing explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a decision code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the decision.
    pub title: &'static str,
    /// Why the evaluator reached it.
    pub description: &'static str,
    /// What an operator can change.
    pub remediation: &'static str,
}

/// Look up an explanation by decision code.
///
/// Returns `None` if the code is not recognized.
pub fn lookup_explanation(code: &str) -> Option<Explanation> {
    let (title, description, remediation) = match code {
        ids::CODE_PIN_DISABLED => (
            "Pinning Disabled",
            "Certificate pinning is globally off, so every chain is accepted.",
            "Enable pinning in the policy once pins are configured.",
        ),
        ids::CODE_PIN_EMPTY_CHAIN => (
            "Empty Certificate Chain",
            "The TLS layer supplied no certificates while pinning was enabled.",
            "Check the session integration; an empty chain is never trusted.",
        ),
        ids::CODE_PIN_NOT_PINNED => (
            "Host Not Pinned",
            "No pin configuration applies to the host. Pinning is opt-in per host.",
            "Add a pin configuration for the host (or a parent with include_subdomains).",
        ),
        ids::CODE_PIN_NO_EXTRACTABLE_KEYS => (
            "No Extractable Public Keys",
            "None of the presented certificates yielded a SubjectPublicKeyInfo.",
            "Verify the chain is DER-encoded X.509.",
        ),
        ids::CODE_PIN_MATCHED => (
            "Pin Matched",
            "At least one certificate's public-key hash is pinned for the host.",
            "No action needed.",
        ),
        ids::CODE_PIN_MISMATCH => (
            "Pin Mismatch",
            "No certificate in the chain carries a pinned public key.",
            "Rotate pins before rotating keys; keep a backup pin configured.",
        ),
        ids::CODE_HTTPS_INVALID_URL => (
            "Invalid URL",
            "The URL could not be parsed.",
            "Pass an absolute URL.",
        ),
        ids::CODE_HTTPS_NO_SCHEME => (
            "No Scheme",
            "The URL has no scheme, so transport security cannot be judged.",
            "Pass an absolute URL.",
        ),
        ids::CODE_HTTPS_HOST_WHITELISTED => (
            "Host Whitelisted For HTTP",
            "The host is exempt from HTTPS enforcement.",
            "Remove the host from allowed_http_hosts to enforce HTTPS for it.",
        ),
        ids::CODE_HTTPS_UPGRADED => (
            "Upgraded To HTTPS",
            "The HTTP URL was rewritten to HTTPS. Default port 80 is dropped.",
            "Serve the resource over HTTPS directly.",
        ),
        ids::CODE_HTTPS_UPGRADE_FAILED => (
            "Upgrade Failed",
            "The HTTP URL could not be rewritten to HTTPS.",
            "Whitelist the host or fix the URL.",
        ),
        ids::CODE_HTTPS_STRICT_BLOCKED => (
            "HTTP Blocked",
            "Strict mode blocks every plain-HTTP request.",
            "Use HTTPS, or add the host to allowed_http_hosts.",
        ),
        ids::CODE_URL_INVALID => (
            "Invalid URL",
            "The URL could not be parsed.",
            "Pass an absolute URL.",
        ),
        ids::CODE_URL_NO_SCHEME => (
            "No Scheme",
            "The URL has no scheme.",
            "Pass an absolute URL.",
        ),
        ids::CODE_URL_BLOCKED_SCHEME => (
            "Blocked Scheme",
            "The scheme is in the blocked set.",
            "Move the scheme to the safe set only if content loaded through it is trusted.",
        ),
        ids::CODE_URL_UNKNOWN_SCHEME => (
            "Unknown Scheme",
            "The scheme is neither safe nor blocked. Unknown schemes fail closed.",
            "Add the scheme to the safe set if it must load.",
        ),
        ids::CODE_URL_JAVASCRIPT => (
            "JavaScript URL",
            "javascript: URLs execute script and are always denied, even when listed as safe.",
            "Run script through the host's script API instead.",
        ),
        ids::CODE_URL_FILE_TRAVERSAL => (
            "File Path Traversal",
            "The file URL path contains `../` or `..\\`.",
            "Use canonical file paths.",
        ),
        ids::CODE_URL_FILE_SUSPICIOUS_PATH => (
            "Suspicious File Path",
            "The file URL path contains `//` after its first position.",
            "Use canonical file paths.",
        ),
        ids::CODE_URL_DATA_MALICIOUS => (
            "Malicious Data URL",
            "The data URL embeds script or event-handler markup.",
            "Load active content from a trusted origin instead.",
        ),
        ids::CODE_URL_DANGEROUS_PATTERN => (
            "Dangerous Pattern",
            "The raw URL string contains a known script-injection token.",
            "Encode or remove the token.",
        ),
        ids::CODE_URL_CUSTOM_RULE => (
            "Custom Rule",
            "A caller-supplied validator rejected the URL.",
            "See the custom validator's own documentation.",
        ),
        _ => return None,
    };

    Some(Explanation {
        title,
        description,
        remediation,
    })
}
