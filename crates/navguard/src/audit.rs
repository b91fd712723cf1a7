//! Security audit events.
//!
//! Every event goes to the `navguard::audit` target. URLs and hosts are
//! sanitized before they reach a subscriber: query strings and fragments can
//! carry tokens or session ids.

use navguard_domain::PinOutcome;
use navguard_types::ValidationResult;

pub const AUDIT_TARGET: &str = "navguard::audit";

const EMPTY_MARKER: &str = "[empty]";
const STRIPPED_MARKER: &str = "[...]";
const MAX_HOST_CHARS: usize = 100;
const TRUNCATED_HOST_CHARS: usize = 97;

/// Drop the query string and fragment from a URL for logging.
///
/// A `?` or `#` only counts when it is not the first character.
pub fn sanitize_url(url: &str) -> String {
    if url.is_empty() {
        return EMPTY_MARKER.to_string();
    }

    let first_after_start = |c: char| url.find(c).filter(|&i| i > 0);
    let cut = match (first_after_start('?'), first_after_start('#')) {
        (Some(q), Some(f)) => Some(q.min(f)),
        (q, f) => q.or(f),
    };

    match cut {
        Some(end) => format!("{}{STRIPPED_MARKER}", &url[..end]),
        None => url.to_string(),
    }
}

/// Truncate overly long hostnames to 97 characters plus `...`.
pub fn sanitize_host(host: &str) -> String {
    if host.is_empty() {
        return EMPTY_MARKER.to_string();
    }
    if host.chars().count() > MAX_HOST_CHARS {
        let head: String = host.chars().take(TRUNCATED_HOST_CHARS).collect();
        return format!("{head}...");
    }
    host.to_string()
}

pub(crate) fn pin_decision(host: &str, outcome: &PinOutcome) {
    let host = sanitize_host(host);
    let code = outcome.code();
    let pinned_host = outcome
        .pinned_host()
        .map(sanitize_host)
        .unwrap_or_default();
    match outcome {
        PinOutcome::Matched { .. } => tracing::info!(
            target: AUDIT_TARGET,
            event = "certificate_pin",
            host = %host,
            pinned_host = %pinned_host,
            code,
            allowed = true,
            "certificate chain matched a pinned key"
        ),
        PinOutcome::PinningDisabled | PinOutcome::NotPinned => tracing::debug!(
            target: AUDIT_TARGET,
            event = "certificate_pin",
            host = %host,
            code,
            allowed = true,
            "certificate chain not subject to pinning"
        ),
        PinOutcome::EmptyChain
        | PinOutcome::NoExtractableKeys { .. }
        | PinOutcome::Mismatch { .. } => tracing::warn!(
            target: AUDIT_TARGET,
            event = "certificate_pin",
            host = %host,
            pinned_host = %pinned_host,
            code,
            allowed = false,
            "certificate chain rejected"
        ),
    }
}

pub(crate) fn url_decision(event: &'static str, url: &str, result: &ValidationResult) {
    let url = sanitize_url(url);
    let code = result.code().unwrap_or("");
    match result {
        ValidationResult::Allowed { upgraded_url, .. } => {
            let upgraded = upgraded_url.as_deref().map(sanitize_url);
            tracing::debug!(
                target: AUDIT_TARGET,
                event,
                url = %url,
                upgraded_url = upgraded.as_deref(),
                code,
                allowed = true,
                "url allowed"
            );
        }
        ValidationResult::Denied { reason } => tracing::warn!(
            target: AUDIT_TARGET,
            event,
            url = %url,
            code,
            allowed = false,
            reason = %reason.message,
            "url denied"
        ),
    }
}

pub(crate) fn config_change(event: &'static str, detail: &str) {
    tracing::debug!(target: AUDIT_TARGET, event, detail, "policy updated");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_url_strips_query_and_fragment() {
        assert_eq!(
            sanitize_url("https://a.com/p?token=secret#frag"),
            "https://a.com/p[...]"
        );
        assert_eq!(sanitize_url("https://a.com/p#x?y"), "https://a.com/p[...]");
        assert_eq!(sanitize_url("https://a.com/p"), "https://a.com/p");
    }

    #[test]
    fn sanitize_url_ignores_leading_marker_and_empty() {
        assert_eq!(sanitize_url(""), "[empty]");
        assert_eq!(sanitize_url("?abc"), "?abc");
        assert_eq!(sanitize_url("#a?b"), "#a[...]");
    }

    #[test]
    fn sanitize_host_truncates_long_names() {
        let long = "a".repeat(150);
        let out = sanitize_host(&long);
        assert_eq!(out.len(), 100);
        assert!(out.ends_with("..."));
        assert_eq!(sanitize_host(&"b".repeat(100)), "b".repeat(100));
        assert_eq!(sanitize_host(""), "[empty]");
    }

    proptest::proptest! {
        #[test]
        fn sanitized_url_never_keeps_query_text(
            path in "[a-z:/.]{1,20}",
            secret in "[A-Za-z0-9]{4,16}",
        ) {
            let url = format!("{path}?key={secret}");
            let out = sanitize_url(&url);
            let leaked = format!("key={secret}");
            proptest::prop_assert!(!out.contains(&leaked));
            proptest::prop_assert!(out.ends_with("[...]"));
        }

        #[test]
        fn sanitized_host_is_bounded(host in "[a-z.]{0,300}") {
            proptest::prop_assert!(sanitize_host(&host).chars().count() <= 100);
        }
    }
}
