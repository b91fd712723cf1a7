//! Fuzz target for certificate chain pinning.
//!
//! Goal: arbitrary DER bytes never panic key extraction, and a pinned host is
//! never trusted on a chain whose keys cannot be extracted.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_certificate_chain
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use navguard_domain::{PinConfiguration, PinPolicy, hash_public_key, pinning};

fuzz_target!(|chain: Vec<Vec<u8>>| {
    let mut policy = PinPolicy::new(true);
    policy.insert(
        PinConfiguration::new("example.com", ["AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="])
            .include_subdomains(true),
    );

    let outcome = pinning::evaluate(&policy, &chain, "api.example.com");
    let any_key = chain.iter().any(|der| hash_public_key(der).is_some());
    if !any_key {
        assert!(!outcome.is_trusted());
    }
});
