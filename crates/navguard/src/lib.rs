//! Request-level security policy for embedded browsers and HTTP clients.
//!
//! [`PolicyHolder`] owns the live policy and answers three independent
//! questions about a request:
//!
//! - is this certificate chain acceptable for this host (public-key pinning)?
//! - may this URL go out over plain HTTP, or should it be upgraded or blocked?
//! - is this URL's scheme and content safe to load?
//!
//! Pinning fails open (a host without a pin accepts any non-empty chain);
//! scheme validation fails closed (an unknown scheme is denied).
//!
//! Decisions are reported as audit events on the `navguard::audit` tracing
//! target, with query strings and fragments stripped.

#![forbid(unsafe_code)]

pub mod audit;
mod explain;
mod holder;

pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use holder::PolicyHolder;

pub use navguard_domain::{
    CustomValidator, HttpsPolicy, PinConfiguration, PinOutcome, PinPolicy, PolicySnapshot,
    SchemePolicy, hash_public_key,
};
pub use navguard_settings::{
    NavguardConfigV1, Overrides, Profile, ResolvedConfig, parse_config_toml, resolve_config,
};
pub use navguard_types::{HttpsStrategy, Reason, SchemeClass, ValidationResult, ids};
