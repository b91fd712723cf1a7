//! Fuzz target for HTTPS enforcement and URL scheme validation.
//!
//! Goal: every URL string gets a decision. No panics, and an upgraded URL
//! only ever appears on an allowed result.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_url_validation
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use navguard_domain::{HttpsPolicy, SchemePolicy, https, scheme};
use navguard_types::HttpsStrategy;

#[derive(Arbitrary, Debug)]
struct Input {
    strategy: u8,
    whitelist: Option<String>,
    extra_safe: Option<String>,
    url: String,
}

fuzz_target!(|input: Input| {
    let strategy = match input.strategy % 3 {
        0 => HttpsStrategy::Disabled,
        1 => HttpsStrategy::Upgrade,
        _ => HttpsStrategy::Strict,
    };
    let mut https_policy = HttpsPolicy::new(strategy);
    if let Some(host) = &input.whitelist {
        https_policy.allow_http_host(host);
    }

    let result = https::validate(&https_policy, &input.url);
    if result.upgraded_url().is_some() {
        assert!(result.is_allowed());
    }

    let mut schemes = SchemePolicy::default();
    if let Some(s) = &input.extra_safe {
        schemes.add_safe(s);
    }
    let _ = scheme::validate(&schemes, &input.url);
    let _ = scheme::validate_with_pattern_prefilter(&schemes, &input.url);
});
