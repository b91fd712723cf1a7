//! Fuzz target for `navguard.toml` parsing and resolution.
//!
//! Goal: The parser and resolver should **never panic** on any input.
//! They may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_toml
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data)
        && let Ok(cfg) = navguard_settings::parse_config_toml(text)
    {
        let _ = navguard_settings::resolve_config(cfg, Default::default());
    }
});
